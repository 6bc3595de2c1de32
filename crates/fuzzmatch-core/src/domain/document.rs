//! Documents - keyed records made of typed elements

use ahash::AHashSet;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::element::{Classification, Element, ElementBuilder, ElementKey, ElementType};
use super::matching::Matchable;
use super::value::Value;
use crate::config::MatchConfig;
use crate::error::{MatchError, Result};
use crate::scoring::ScoringFunction;

/// A record to be matched. Equality and hashing use the key only.
#[derive(Debug, Clone)]
pub struct Document {
    key: Arc<str>,
    threshold: f64,
    scoring: ScoringFunction,
    elements: Vec<Element>,
    /// Positions into `elements` that take part in matching
    matchable: Vec<usize>,
    type_counts: BTreeMap<Classification, usize>,
}

impl Document {
    pub fn builder(key: impl Into<String>) -> DocumentBuilder {
        DocumentBuilder::new(key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Every element supplied at construction, after raw-value dedup
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Elements used for matching: distinct by (classification, normalized
    /// value), empty text dropped
    pub fn matchable_elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.matchable.iter().map(move |&i| &self.elements[i])
    }

    pub fn element(&self, key: &ElementKey) -> Option<&Element> {
        if key.document() != self.key() {
            return None;
        }
        self.elements.get(key.ordinal())
    }

    /// Matchable element count per classification
    pub fn type_counts(&self) -> &BTreeMap<Classification, usize> {
        &self.type_counts
    }

    fn count_of(&self, classification: &Classification) -> usize {
        self.type_counts.get(classification).copied().unwrap_or(0)
    }

    fn classifications<'a>(&'a self, other: &'a Self) -> AHashSet<&'a Classification> {
        self.type_counts
            .keys()
            .chain(other.type_counts.keys())
            .collect()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}: [", self.key)?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", element)?;
        }
        f.write_str("]}")
    }
}

impl Matchable for Document {
    fn weight(&self) -> f64 {
        1.0
    }

    fn child_count(&self, other: &Self) -> usize {
        self.classifications(other)
            .into_iter()
            .map(|c| self.count_of(c).max(other.count_of(c)))
            .sum()
    }

    fn unmatched_child_count(&self, other: &Self) -> usize {
        self.classifications(other)
            .into_iter()
            .map(|c| self.count_of(c).abs_diff(other.count_of(c)))
            .sum()
    }

    fn scoring(&self) -> &ScoringFunction {
        &self.scoring
    }
}

/// Builder for [`Document`]
///
/// ```
/// use fuzzmatch_core::Document;
///
/// let doc = Document::builder("1")
///     .name("James Parker")
///     .address("123 new st. Minneapolis MN")
///     .phone("(123) 234 2345")
///     .build()
///     .unwrap();
/// assert_eq!(doc.key(), "1");
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    key: String,
    threshold: Option<f64>,
    scoring: Option<ScoringFunction>,
    elements: Vec<ElementBuilder>,
    config: MatchConfig,
}

impl DocumentBuilder {
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_config(key, &MatchConfig::default())
    }

    /// Seed document and element defaults from `config`
    pub fn with_config(key: impl Into<String>, config: &MatchConfig) -> Self {
        Self {
            key: key.into(),
            threshold: None,
            scoring: None,
            elements: Vec::new(),
            config: config.clone(),
        }
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn scoring(mut self, scoring: ScoringFunction) -> Self {
        self.scoring = Some(scoring);
        self
    }

    pub fn element(mut self, element: ElementBuilder) -> Self {
        self.elements.push(element);
        self
    }

    fn typed(self, element_type: ElementType, value: impl Into<Value>) -> Self {
        self.element(ElementBuilder::new(element_type, value))
    }

    pub fn name(self, value: impl Into<Value>) -> Self {
        self.typed(ElementType::Name, value)
    }

    pub fn text(self, value: impl Into<Value>) -> Self {
        self.typed(ElementType::Text, value)
    }

    pub fn address(self, value: impl Into<Value>) -> Self {
        self.typed(ElementType::Address, value)
    }

    pub fn email(self, value: impl Into<Value>) -> Self {
        self.typed(ElementType::Email, value)
    }

    pub fn phone(self, value: impl Into<Value>) -> Self {
        self.typed(ElementType::Phone, value)
    }

    pub fn number(self, value: impl Into<Value>) -> Self {
        self.typed(ElementType::Number, value)
    }

    pub fn date(self, value: impl Into<Value>) -> Self {
        self.typed(ElementType::Date, value)
    }

    pub fn age(self, value: impl Into<Value>) -> Self {
        self.typed(ElementType::Age, value)
    }

    pub fn build(self) -> Result<Document> {
        if self.key.is_empty() {
            return Err(MatchError::InvalidConfig(
                "document key must not be empty".to_string(),
            ));
        }
        let threshold = self.threshold.unwrap_or(self.config.document_threshold);
        if !threshold.is_finite() {
            return Err(MatchError::InvalidConfig(format!(
                "document {} threshold must be finite, got {}",
                self.key, threshold
            )));
        }

        let key: Arc<str> = Arc::from(self.key);
        let mut raw_seen = AHashSet::new();
        let mut elements = Vec::with_capacity(self.elements.len());
        for builder in self.elements {
            if !raw_seen.insert((builder.classification(), builder.raw_value().clone())) {
                continue;
            }
            let element_key = ElementKey::new(key.clone(), elements.len());
            elements.push(builder.build(element_key, &self.config)?);
        }

        let mut normalized_seen = AHashSet::new();
        let mut matchable = Vec::new();
        let mut type_counts = BTreeMap::new();
        for (i, element) in elements.iter().enumerate() {
            if element.normalized().is_empty_text() {
                continue;
            }
            if normalized_seen.insert((element.classification(), element.normalized())) {
                matchable.push(i);
                *type_counts
                    .entry(element.classification().clone())
                    .or_insert(0) += 1;
            }
        }

        Ok(Document {
            key,
            threshold,
            scoring: self.scoring.unwrap_or_else(|| self.config.scoring.clone()),
            elements,
            matchable,
            type_counts,
        })
    }
}
