//! Elements - typed field values inside a document

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::matching::Matchable;
use super::value::Value;
use crate::config::MatchConfig;
use crate::error::{MatchError, Result};
use crate::normalize::{self, NormalizeFn};
use crate::scoring::ScoringFunction;
use crate::tokenize::{self, TokenizeFn};

static ELEMENT_SCORING: ScoringFunction = ScoringFunction::ExponentialWeightedAverage;

/// Field type of an element. Selects the default normalizer, tokenizer
/// and lookup strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Name,
    Text,
    Address,
    Email,
    Phone,
    Number,
    Date,
    Age,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Text => "text",
            Self::Address => "address",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Number => "number",
            Self::Date => "date",
            Self::Age => "age",
        }
    }

    pub fn default_normalizer(&self) -> NormalizeFn {
        match self {
            Self::Name => normalize::name(),
            Self::Text => normalize::remove_special_chars(),
            Self::Address => normalize::address(),
            Self::Email => normalize::remove_domain(),
            Self::Phone => normalize::us_phone(),
            Self::Number | Self::Age => normalize::number(),
            Self::Date => normalize::identity(),
        }
    }

    pub fn default_tokenizer(&self) -> TokenizeFn {
        match self {
            Self::Name | Self::Address => tokenize::word_soundex(),
            Self::Text => tokenize::word(),
            Self::Email => tokenize::tri_gram(),
            Self::Phone => tokenize::deca_gram(),
            Self::Number | Self::Date | Self::Age => tokenize::value(),
        }
    }

    pub fn default_match_type(&self) -> MatchType {
        match self {
            Self::Number | Self::Date | Self::Age => MatchType::NearestNeighbors,
            _ => MatchType::Equality,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index lookup strategy for a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Exact token lookup
    Equality,
    /// Tolerance-window lookup over ordered numeric and temporal tokens
    NearestNeighbors,
}

/// (type, variance) pair. Elements only match elements of the same
/// classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Classification {
    pub element_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<String>,
}

impl Classification {
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            variance: None,
        }
    }

    pub fn with_variance(element_type: ElementType, variance: impl Into<String>) -> Self {
        Self {
            element_type,
            variance: Some(variance.into()),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variance {
            Some(variance) => write!(f, "{}/{}", self.element_type, variance),
            None => write!(f, "{}", self.element_type),
        }
    }
}

/// Non-owning handle to an element: owning document key plus position
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey {
    document: Arc<str>,
    ordinal: usize,
}

impl ElementKey {
    pub fn new(document: Arc<str>, ordinal: usize) -> Self {
        Self { document, ordinal }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.document, self.ordinal)
    }
}

/// A token value and the element it came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    value: Value,
    element: ElementKey,
}

impl Token {
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn element(&self) -> &ElementKey {
        &self.element
    }
}

/// A typed field value with its normalized form and distinct tokens.
///
/// Built through [`ElementBuilder`] as part of a document; immutable after.
#[derive(Debug, Clone)]
pub struct Element {
    key: ElementKey,
    classification: Classification,
    value: Value,
    weight: f64,
    threshold: f64,
    neighborhood_range: f64,
    match_type: MatchType,
    normalized: Value,
    tokens: Vec<Token>,
}

impl Element {
    pub fn key(&self) -> &ElementKey {
        &self.key
    }

    pub fn document_key(&self) -> &str {
        self.key.document()
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn element_type(&self) -> ElementType {
        self.classification.element_type
    }

    /// Raw value as supplied to the builder
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn normalized(&self) -> &Value {
        &self.normalized
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn neighborhood_range(&self) -> f64 {
        self.neighborhood_range
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// Overlap ratio against `other` given the number of shared tokens
    pub fn score(&self, matching_tokens: usize, other: &Element) -> f64 {
        let expected = self.child_count(other);
        if expected == 0 {
            return 0.0;
        }
        matching_tokens as f64 / expected as f64
    }

    fn empty_token_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| t.value.is_empty_text())
            .count()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}='{}'", self.classification, self.value)
    }
}

impl Matchable for Element {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn child_count(&self, other: &Self) -> usize {
        self.tokens.len().max(other.tokens.len())
    }

    fn unmatched_child_count(&self, other: &Self) -> usize {
        self.empty_token_count().max(other.empty_token_count())
    }

    fn scoring(&self) -> &ScoringFunction {
        &ELEMENT_SCORING
    }
}

/// Declarative element definition. Every knob left unset falls back to the
/// document's config, then to the element type's default.
#[derive(Clone)]
pub struct ElementBuilder {
    element_type: ElementType,
    value: Value,
    variance: Option<String>,
    weight: Option<f64>,
    threshold: Option<f64>,
    neighborhood_range: Option<f64>,
    normalizer: Option<NormalizeFn>,
    tokenizer: Option<TokenizeFn>,
    match_type: Option<MatchType>,
}

impl ElementBuilder {
    pub fn new(element_type: ElementType, value: impl Into<Value>) -> Self {
        Self {
            element_type,
            value: value.into(),
            variance: None,
            weight: None,
            threshold: None,
            neighborhood_range: None,
            normalizer: None,
            tokenizer: None,
            match_type: None,
        }
    }

    pub fn name(value: impl Into<Value>) -> Self {
        Self::new(ElementType::Name, value)
    }

    pub fn text(value: impl Into<Value>) -> Self {
        Self::new(ElementType::Text, value)
    }

    pub fn address(value: impl Into<Value>) -> Self {
        Self::new(ElementType::Address, value)
    }

    pub fn email(value: impl Into<Value>) -> Self {
        Self::new(ElementType::Email, value)
    }

    pub fn phone(value: impl Into<Value>) -> Self {
        Self::new(ElementType::Phone, value)
    }

    pub fn number(value: impl Into<Value>) -> Self {
        Self::new(ElementType::Number, value)
    }

    pub fn date(value: impl Into<Value>) -> Self {
        Self::new(ElementType::Date, value)
    }

    pub fn age(value: impl Into<Value>) -> Self {
        Self::new(ElementType::Age, value)
    }

    pub fn variance(mut self, variance: impl Into<String>) -> Self {
        self.variance = Some(variance.into());
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn neighborhood_range(mut self, range: f64) -> Self {
        self.neighborhood_range = Some(range);
        self
    }

    pub fn normalizer(mut self, normalizer: NormalizeFn) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn tokenizer(mut self, tokenizer: TokenizeFn) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = Some(match_type);
        self
    }

    pub(crate) fn classification(&self) -> Classification {
        Classification {
            element_type: self.element_type,
            variance: self.variance.clone(),
        }
    }

    pub(crate) fn raw_value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn build(self, key: ElementKey, config: &MatchConfig) -> Result<Element> {
        let classification = self.classification();
        let weight = self.weight.unwrap_or(config.element_weight);
        let threshold = self.threshold.unwrap_or(config.element_threshold);
        let neighborhood_range = self
            .neighborhood_range
            .unwrap_or(config.neighborhood_range);

        if !weight.is_finite() || weight < 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "{} weight must be finite and non-negative, got {}",
                classification, weight
            )));
        }
        if !threshold.is_finite() {
            return Err(MatchError::InvalidConfig(format!(
                "{} threshold must be finite, got {}",
                classification, threshold
            )));
        }
        if !(0.0..=1.0).contains(&neighborhood_range) {
            return Err(MatchError::InvalidConfig(format!(
                "{} neighborhood range must be within [0, 1], got {}",
                classification, neighborhood_range
            )));
        }

        let normalizer = self
            .normalizer
            .unwrap_or_else(|| self.element_type.default_normalizer());
        let tokenizer = self
            .tokenizer
            .unwrap_or_else(|| self.element_type.default_tokenizer());
        let match_type = self
            .match_type
            .unwrap_or_else(|| self.element_type.default_match_type());

        let normalized = match normalizer(&self.value) {
            Value::Text(text) => Value::Text(text.trim().to_lowercase()),
            other => other,
        };

        let mut seen = AHashSet::new();
        let tokens = tokenizer(&normalized)
            .into_iter()
            .filter(|value| seen.insert(value.clone()))
            .map(|value| Token {
                value,
                element: key.clone(),
            })
            .collect();

        Ok(Element {
            key,
            classification,
            value: self.value,
            weight,
            threshold,
            neighborhood_range,
            match_type,
            normalized,
            tokens,
        })
    }
}

impl fmt::Debug for ElementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementBuilder")
            .field("element_type", &self.element_type)
            .field("value", &self.value)
            .field("variance", &self.variance)
            .field("weight", &self.weight)
            .field("threshold", &self.threshold)
            .field("neighborhood_range", &self.neighborhood_range)
            .field("custom_normalizer", &self.normalizer.is_some())
            .field("custom_tokenizer", &self.tokenizer.is_some())
            .field("match_type", &self.match_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(builder: ElementBuilder) -> Element {
        builder
            .build(ElementKey::new(Arc::from("doc"), 0), &MatchConfig::default())
            .unwrap()
    }

    fn token_texts(element: &Element) -> Vec<String> {
        element
            .tokens()
            .iter()
            .map(|t| t.value().to_string())
            .collect()
    }

    #[test]
    fn test_defaults_resolved_from_type() {
        let element = build(ElementBuilder::age(32));
        assert_eq!(element.match_type(), MatchType::NearestNeighbors);
        assert_eq!(element.weight(), 1.0);
        assert_eq!(element.threshold(), 0.3);
        assert_eq!(element.neighborhood_range(), 0.9);

        let element = build(ElementBuilder::email("a@b.com"));
        assert_eq!(element.match_type(), MatchType::Equality);
    }

    #[test]
    fn test_override_wins_over_default() {
        let element = build(
            ElementBuilder::number(5)
                .match_type(MatchType::Equality)
                .weight(2.0)
                .threshold(0.6),
        );
        assert_eq!(element.match_type(), MatchType::Equality);
        assert_eq!(element.weight(), 2.0);
        assert_eq!(element.threshold(), 0.6);
    }

    #[test]
    fn test_normalized_value_is_trimmed_and_lowercased() {
        let element = build(ElementBuilder::text("  Hello World  "));
        assert_eq!(element.normalized(), &Value::from("hello world"));
    }

    #[test]
    fn test_tokens_are_distinct() {
        let element = build(ElementBuilder::address("123 new Street new street"));
        assert_eq!(token_texts(&element), vec!["123", "N000", "S363"]);
    }

    #[test]
    fn test_child_counts() {
        let a = build(ElementBuilder::text("one two three"));
        let b = build(ElementBuilder::text("one"));
        assert_eq!(a.child_count(&b), 3);
        assert_eq!(a.unmatched_child_count(&b), 0);
        assert!((a.score(1, &b) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_knobs_rejected() {
        let key = ElementKey::new(Arc::from("doc"), 0);
        let config = MatchConfig::default();
        let err = ElementBuilder::name("x")
            .weight(-1.0)
            .build(key.clone(), &config);
        assert!(matches!(err, Err(MatchError::InvalidConfig(_))));

        let err = ElementBuilder::age(1)
            .neighborhood_range(1.5)
            .build(key.clone(), &config);
        assert!(matches!(err, Err(MatchError::InvalidConfig(_))));

        let err = ElementBuilder::age(1)
            .threshold(f64::NAN)
            .build(key, &config);
        assert!(matches!(err, Err(MatchError::InvalidConfig(_))));
    }

    #[test]
    fn test_classification_display() {
        assert_eq!(Classification::new(ElementType::Name).to_string(), "name");
        assert_eq!(
            Classification::with_variance(ElementType::Name, "spouse").to_string(),
            "name/spouse"
        );
    }
}
