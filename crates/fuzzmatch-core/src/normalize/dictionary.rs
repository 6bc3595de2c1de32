//! Word substitution tables for name and address normalization
//!
//! A table is UTF-8 text with one `key: value` pair per line. Keys and
//! values are trimmed and lower-cased; an empty value removes the word.

use ahash::AHashMap;
use lazy_static::lazy_static;
use std::path::Path;
use tracing::error;

use crate::error::{MatchError, Result};

const NAME_TABLE: &str = include_str!("../../resources/name-dictionary.txt");
const ADDRESS_TABLE: &str = include_str!("../../resources/address-dictionary.txt");

lazy_static! {
    static ref NAMES: Dictionary = bundled("name", NAME_TABLE);
    static ref ADDRESSES: Dictionary = bundled("address", ADDRESS_TABLE);
}

fn bundled(table: &str, source: &str) -> Dictionary {
    Dictionary::parse(source).unwrap_or_else(|e| {
        error!("Bundled {} dictionary failed to load: {}", table, e);
        Dictionary::default()
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: AHashMap<String, String>,
}

impl Dictionary {
    /// Parse `key: value` lines. Blank lines are skipped; a later key
    /// replaces an earlier one.
    pub fn parse(source: &str) -> Result<Self> {
        let mut entries = AHashMap::new();
        for (index, line) in source.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (key, value) = line.split_once(':').ok_or_else(|| MatchError::Dictionary {
                line: index + 1,
                message: format!("expected `key: value`, got {:?}", line),
            })?;
            let key = key.trim().to_lowercase();
            if key.is_empty() {
                return Err(MatchError::Dictionary {
                    line: index + 1,
                    message: "empty key".to_string(),
                });
            }
            entries.insert(key, value.trim().to_lowercase());
        }
        Ok(Self { entries })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Bundled name table: honorifics plus personal and corporate suffixes
    pub fn names() -> &'static Dictionary {
        &NAMES
    }

    /// Bundled address table: street suffixes, directionals, US states
    pub fn addresses() -> &'static Dictionary {
        &ADDRESSES
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.entries.get(&word.to_lowercase()).map(String::as_str)
    }

    /// Replace every whitespace-separated word found in the table
    pub fn normalize(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| self.get(word).unwrap_or(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
