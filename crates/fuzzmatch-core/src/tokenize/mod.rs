//! Tokenizers turning a normalized value into index tokens
//!
//! String tokenizers work on the display form of non-text values, so a
//! number under a word tokenizer yields its digits as one word.

#[cfg(feature = "phonetic")]
mod metaphone;
mod ngram;
pub mod soundex;

pub use ngram::ngrams;
pub use soundex::Soundex;

use std::sync::Arc;

use crate::domain::Value;

pub type TokenizeFn = Arc<dyn Fn(&Value) -> Vec<Value> + Send + Sync>;

/// Lift a string splitter into a tokenizer
pub fn text_fn<I>(f: impl Fn(&str) -> I + Send + Sync + 'static) -> TokenizeFn
where
    I: IntoIterator<Item = String>,
{
    Arc::new(move |value: &Value| {
        f(value.to_text().as_ref())
            .into_iter()
            .map(Value::Text)
            .collect()
    })
}

/// The whole value as a single token
pub fn value() -> TokenizeFn {
    Arc::new(|value: &Value| vec![value.clone()])
}

/// Whitespace-separated words
pub fn word() -> TokenizeFn {
    text_fn(|s| s.split_whitespace().map(str::to_string).collect::<Vec<_>>())
}

/// Soundex code per word. Words containing a digit pass through as-is, as
/// does any word that encodes to nothing.
pub fn word_soundex() -> TokenizeFn {
    word_soundex_with(Soundex::US_ENGLISH)
}

/// [`word_soundex`] with another Soundex table
pub fn word_soundex_with(soundex: Soundex) -> TokenizeFn {
    phonetic_words(move |word| soundex.encode(word))
}

/// Double Metaphone primary code per word, with the same pass-through
/// rules as [`word_soundex`]
#[cfg(feature = "phonetic")]
pub fn double_metaphone() -> TokenizeFn {
    phonetic_words(metaphone::encode)
}

fn phonetic_words(encode: impl Fn(&str) -> String + Send + Sync + 'static) -> TokenizeFn {
    text_fn(move |s| {
        s.split_whitespace()
            .map(|word| {
                if word.chars().any(|c| c.is_ascii_digit()) {
                    return word.to_string();
                }
                let code = encode(word);
                if code.is_empty() {
                    word.to_string()
                } else {
                    code
                }
            })
            .collect::<Vec<_>>()
    })
}

/// Sliding character windows of width `n`
pub fn ngram(n: usize) -> TokenizeFn {
    text_fn(move |s| ngrams(s, n))
}

pub fn tri_gram() -> TokenizeFn {
    ngram(3)
}

pub fn deca_gram() -> TokenizeFn {
    ngram(10)
}

/// Run every tokenizer and concatenate their tokens in order
pub fn chain(tokenizers: impl IntoIterator<Item = TokenizeFn>) -> TokenizeFn {
    let tokenizers: Vec<TokenizeFn> = tokenizers.into_iter().collect();
    Arc::new(move |value: &Value| tokenizers.iter().flat_map(|t| t(value)).collect())
}
