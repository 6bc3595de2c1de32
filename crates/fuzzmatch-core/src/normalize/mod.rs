//! Value normalization applied before tokenization
//!
//! Every normalizer maps a [`Value`] to a [`Value`]. String-oriented
//! normalizers leave non-text values untouched.

mod dictionary;

pub use dictionary::Dictionary;

use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

use crate::domain::Value;

pub type NormalizeFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

lazy_static! {
    static ref SPECIAL_CHARS: Regex = Regex::new(r"[^A-Za-z0-9 ]+").expect("static pattern");
    static ref TRAILING_NUMBER: Regex = Regex::new(r"[0-9]+$").expect("static pattern");
    static ref NUMBER: Regex = Regex::new(r"-?[0-9]+(\.[0-9]+)?").expect("static pattern");
}

/// Lift a string transformation into a normalizer. Non-text values pass
/// through unchanged.
pub fn text_fn(f: impl Fn(&str) -> String + Send + Sync + 'static) -> NormalizeFn {
    Arc::new(move |value: &Value| match value {
        Value::Text(s) => Value::Text(f(s)),
        other => other.clone(),
    })
}

/// Run `first`, then `second` on its output
pub fn chain(first: NormalizeFn, second: NormalizeFn) -> NormalizeFn {
    Arc::new(move |value: &Value| second(&first(value)))
}

pub fn identity() -> NormalizeFn {
    Arc::new(|value: &Value| value.clone())
}

pub fn remove_special_chars() -> NormalizeFn {
    text_fn(|s| SPECIAL_CHARS.replace_all(s, "").into_owned())
}

pub fn remove_trailing_number() -> NormalizeFn {
    text_fn(|s| TRAILING_NUMBER.replace(s, "").into_owned())
}

/// Keep ASCII digits only
pub fn numeric_value() -> NormalizeFn {
    text_fn(|s| s.chars().filter(|c| c.is_ascii_digit()).collect())
}

/// Digits only, with the US country code prepended to 10-digit numbers
pub fn us_phone() -> NormalizeFn {
    text_fn(|s| {
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() == 10 {
            format!("1{}", digits)
        } else {
            digits
        }
    })
}

/// Local part of an email address
pub fn remove_domain() -> NormalizeFn {
    text_fn(|s| match s.find('@') {
        Some(at) => s[..at].to_string(),
        None => s.to_string(),
    })
}

/// First signed decimal substring, or the input when there is none
pub fn number() -> NormalizeFn {
    text_fn(|s| match NUMBER.find(s) {
        Some(m) => m.as_str().to_string(),
        None => s.to_string(),
    })
}

pub fn name() -> NormalizeFn {
    name_pipeline(text_fn(|s| Dictionary::names().normalize(s)))
}

/// Name pipeline with a caller-supplied suffix table
pub fn name_with(dictionary: Arc<Dictionary>) -> NormalizeFn {
    name_pipeline(text_fn(move |s| dictionary.normalize(s)))
}

fn name_pipeline(substitute: NormalizeFn) -> NormalizeFn {
    chain(
        chain(remove_trailing_number(), remove_special_chars()),
        substitute,
    )
}

pub fn address() -> NormalizeFn {
    chain(
        remove_special_chars(),
        text_fn(|s| Dictionary::addresses().normalize(s)),
    )
}

/// Address pipeline with a caller-supplied abbreviation table
pub fn address_with(dictionary: Arc<Dictionary>) -> NormalizeFn {
    chain(
        remove_special_chars(),
        text_fn(move |s| dictionary.normalize(s)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(f: &NormalizeFn, input: &str) -> String {
        f(&Value::from(input)).to_string()
    }

    #[test]
    fn test_remove_special_chars() {
        assert_eq!(run(&remove_special_chars(), "a-b.c, d_e!"), "abc de");
    }

    #[test]
    fn test_remove_trailing_number() {
        assert_eq!(run(&remove_trailing_number(), "Nova LLC-1"), "Nova LLC-");
        assert_eq!(run(&remove_trailing_number(), "12 Main"), "12 Main");
    }

    #[test]
    fn test_us_phone() {
        assert_eq!(run(&us_phone(), "(123) 234 2345"), "11232342345");
        assert_eq!(run(&us_phone(), "+1 123-234-2345"), "11232342345");
        assert_eq!(run(&us_phone(), "234-2345"), "2342345");
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(run(&numeric_value(), "a1b2c3"), "123");
    }

    #[test]
    fn test_remove_domain() {
        assert_eq!(run(&remove_domain(), "james.parker@email.com"), "james.parker");
        assert_eq!(run(&remove_domain(), "no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_number_extraction() {
        assert_eq!(run(&number(), "age: -12.5 years"), "-12.5");
        assert_eq!(run(&number(), "none"), "none");
        assert_eq!(number()(&Value::Int(7)), Value::Int(7));
    }

    #[test]
    fn test_name_pipeline() {
        assert_eq!(run(&name(), "Nova LLC-1").trim().to_lowercase(), "nova");
        assert_eq!(
            run(&name(), "James Parker JR.").trim().to_lowercase(),
            "james parker"
        );
    }

    #[test]
    fn test_address_pipeline() {
        assert_eq!(
            run(&address(), "123 XYZ Ltd st, TX").to_lowercase(),
            "123 xyz ltd street texas"
        );
        assert_eq!(
            run(&address(), "123 some-street ave PLano, TX").to_lowercase(),
            "123 somestreet avenue plano texas"
        );
    }

    #[test]
    fn test_address_diagonals_expand_alike() {
        for (short, long) in [
            ("NE", "northeast"),
            ("NW", "northwest"),
            ("SE", "southeast"),
            ("SW", "southwest"),
        ] {
            assert_eq!(
                run(&address(), &format!("100 {} 5th Ave", short)),
                format!("100 {} 5th avenue", long)
            );
        }
    }

    #[test]
    fn test_address_court_and_mount() {
        assert_eq!(run(&address(), "12 Pine Ct"), "12 Pine court");
        assert_eq!(run(&address(), "4 Mt. Vernon Rd"), "4 mount Vernon road");
    }

    #[test]
    fn test_custom_dictionary() {
        let dict = Arc::new(Dictionary::parse("hwy: highway").unwrap());
        assert_eq!(run(&address_with(dict), "Route 9 hwy."), "Route 9 highway");
    }
}
