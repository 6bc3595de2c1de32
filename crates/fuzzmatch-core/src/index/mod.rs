//! Token index - inverted index from token values to owning elements
//!
//! One sub-index per [`Classification`]. Equality sub-indexes answer exact
//! token lookups; nearest-neighbor sub-indexes additionally keep their
//! token values ordered and answer tolerance-window range queries.

mod range;

pub use range::{TokenRange, AGE_BASELINE, DATE_BASELINE};

use ahash::{AHashMap, AHashSet};
use std::collections::BTreeSet;
use std::ops::Bound;

use crate::domain::{Classification, Element, ElementKey, ElementType, MatchType, Value};
use crate::error::{MatchError, Result};

#[derive(Debug)]
struct Repo {
    match_type: MatchType,
    owners: AHashMap<Value, AHashSet<ElementKey>>,
    ordered: BTreeSet<Value>,
}

impl Repo {
    fn new(match_type: MatchType) -> Self {
        Self {
            match_type,
            owners: AHashMap::new(),
            ordered: BTreeSet::new(),
        }
    }

    fn insert(&mut self, value: &Value, owner: &ElementKey) {
        if self.match_type == MatchType::NearestNeighbors {
            self.ordered.insert(value.clone());
        }
        self.owners
            .entry(value.clone())
            .or_default()
            .insert(owner.clone());
    }
}

/// Inverted token index over a corpus of elements
#[derive(Debug, Default)]
pub struct TokenIndex {
    repos: AHashMap<Classification, Repo>,
}

impl TokenIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every token of `element`. The first element inserted for a
    /// classification fixes that classification's match type.
    pub fn insert(&mut self, element: &Element) {
        let repo = self
            .repos
            .entry(element.classification().clone())
            .or_insert_with(|| Repo::new(element.match_type()));
        for token in element.tokens() {
            repo.insert(token.value(), token.element());
        }
    }

    /// Elements owning a token that matches `value`, as queried by
    /// `element`. Unknown classifications yield nothing.
    pub fn lookup<'a>(
        &'a self,
        element: &Element,
        value: &Value,
    ) -> Result<AHashSet<&'a ElementKey>> {
        let Some(repo) = self.repos.get(element.classification()) else {
            return Ok(AHashSet::new());
        };

        match repo.match_type {
            MatchType::Equality => Ok(repo
                .owners
                .get(value)
                .map(|owners| owners.iter().collect())
                .unwrap_or_default()),
            MatchType::NearestNeighbors => {
                let pct = element.neighborhood_range();
                let range = TokenRange::around(value, pct, baseline(element, value))
                    .ok_or_else(|| MatchError::UnsupportedType {
                        kind: value.kind(),
                        classification: element.classification().clone(),
                    })?;
                if range.is_empty() {
                    return Ok(AHashSet::new());
                }
                let window = (Bound::Included(range.lower()), Bound::Included(range.upper()));
                Ok(repo
                    .ordered
                    .range::<Value, _>(window)
                    .filter_map(|v| repo.owners.get(v))
                    .flatten()
                    .collect())
            }
        }
    }

    /// Number of classifications seen
    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn match_type(&self, classification: &Classification) -> Option<MatchType> {
        self.repos.get(classification).map(|r| r.match_type)
    }
}

fn baseline(element: &Element, value: &Value) -> Option<f64> {
    match element.element_type() {
        ElementType::Age => Some(AGE_BASELINE),
        ElementType::Date => Some(DATE_BASELINE),
        _ if value.is_temporal() => Some(DATE_BASELINE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Document;
    use crate::domain::ElementBuilder;

    fn keys(found: AHashSet<&ElementKey>) -> Vec<String> {
        let mut docs: Vec<String> = found
            .into_iter()
            .map(|k| k.document().to_string())
            .collect();
        docs.sort();
        docs
    }

    fn first(doc: &Document) -> &Element {
        &doc.elements()[0]
    }

    #[test]
    fn test_equality_lookup_returns_exact_owners() {
        let a = Document::builder("a").text("red apple").build().unwrap();
        let b = Document::builder("b").text("green apple").build().unwrap();
        let c = Document::builder("c").text("red pear").build().unwrap();
        let mut index = TokenIndex::new();
        for doc in [&a, &b, &c] {
            index.insert(first(doc));
        }

        let found = index.lookup(first(&a), &Value::from("apple")).unwrap();
        assert_eq!(keys(found), vec!["a", "b"]);
        let found = index.lookup(first(&a), &Value::from("red")).unwrap();
        assert_eq!(keys(found), vec!["a", "c"]);
        let found = index.lookup(first(&a), &Value::from("plum")).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_unknown_classification_is_empty() {
        let a = Document::builder("a").text("red").build().unwrap();
        let b = Document::builder("b").name("red").build().unwrap();
        let mut index = TokenIndex::new();
        index.insert(first(&a));
        assert!(index.lookup(first(&b), &Value::from("red")).unwrap().is_empty());
    }

    #[test]
    fn test_nearest_neighbor_window() {
        let docs: Vec<Document> = [30, 31, 33, 40]
            .iter()
            .map(|age| {
                Document::builder(age.to_string())
                    .age(*age)
                    .build()
                    .unwrap()
            })
            .collect();
        let mut index = TokenIndex::new();
        for doc in &docs {
            index.insert(first(doc));
        }
        let found = index.lookup(first(&docs[1]), &Value::Int(31)).unwrap();
        assert_eq!(keys(found), vec!["30", "31"]);
    }

    #[test]
    fn test_temporal_values_use_date_baseline_for_any_type() {
        use chrono::{TimeZone, Utc};

        // a relative window around 2020 would span years; the date
        // baseline keeps it to about half a year
        let docs: Vec<Document> = [(1, 1), (1, 2), (12, 31)]
            .iter()
            .zip(["a", "b", "c"])
            .map(|(&(month, day), key)| {
                let at = Utc.with_ymd_and_hms(2020, month, day, 0, 0, 0).unwrap();
                Document::builder(key).number(at).build().unwrap()
            })
            .collect();
        let mut index = TokenIndex::new();
        for doc in &docs {
            index.insert(first(doc));
        }
        let subject = first(&docs[0]);
        let found = index.lookup(subject, subject.normalized()).unwrap();
        assert_eq!(keys(found), vec!["a", "b"]);
    }

    #[test]
    fn test_nan_matches_nothing() {
        let docs: Vec<Document> = ["a", "b"]
            .iter()
            .map(|key| Document::builder(*key).number(f64::NAN).build().unwrap())
            .collect();
        let mut index = TokenIndex::new();
        for doc in &docs {
            index.insert(first(doc));
        }
        let found = index.lookup(first(&docs[0]), &Value::Double(f64::NAN)).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_text_under_nearest_neighbors_is_unsupported() {
        let doc = Document::builder("a")
            .element(ElementBuilder::text("abc").match_type(MatchType::NearestNeighbors))
            .build()
            .unwrap();
        let mut index = TokenIndex::new();
        index.insert(first(&doc));
        let err = index.lookup(first(&doc), &Value::from("abc")).unwrap_err();
        assert!(matches!(err, MatchError::UnsupportedType { kind: "text", .. }));
    }

    #[test]
    fn test_first_insert_fixes_match_type() {
        let a = Document::builder("a").number(5).build().unwrap();
        let b = Document::builder("b")
            .element(ElementBuilder::number(5).match_type(MatchType::Equality))
            .build()
            .unwrap();
        let mut index = TokenIndex::new();
        index.insert(first(&a));
        index.insert(first(&b));
        let classification = Classification::new(ElementType::Number);
        assert_eq!(
            index.match_type(&classification),
            Some(MatchType::NearestNeighbors)
        );
    }
}
