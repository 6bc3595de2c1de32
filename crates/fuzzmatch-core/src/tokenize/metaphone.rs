//! Double Metaphone word codes

use rphonetic::DoubleMetaphone;

/// Primary Double Metaphone code of `word`. Empty for input the encoder
/// cannot handle.
pub fn encode(word: &str) -> String {
    if !word.is_ascii() {
        return String::new();
    }
    DoubleMetaphone::default().double_metaphone(word).primary().to_string()
}
