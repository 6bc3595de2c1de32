//! Character n-grams

/// Every window of `n` characters, left to right. Strings no longer than
/// `n` come back whole.
pub fn ngrams(text: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if n == 0 || chars.len() <= n {
        return vec![text.to_string()];
    }
    chars.windows(n).map(|w| w.iter().collect()).collect()
}
