//! Matching configuration
//!
//! Defaults applied to documents and elements whose builders leave a knob
//! unset, plus run-level switches for the matchers.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MatchError, Result};
use crate::scoring::ScoringFunction;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Score a document match must exceed (default: 0.5)
    pub document_threshold: f64,
    /// Score an element match must exceed (default: 0.3)
    pub element_threshold: f64,
    /// Weight of an element in weighted scoring (default: 1.0)
    pub element_weight: f64,
    /// Nearest-neighbor narrowing in [0, 1]; higher is stricter (default: 0.9)
    pub neighborhood_range: f64,
    /// Document aggregation (default: exponential weighted average)
    pub scoring: ScoringFunction,
    /// Let a document match itself within one corpus
    pub allow_self_match: bool,
    /// Corpus size from which document matching runs on the rayon pool
    pub parallel_threshold: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            document_threshold: 0.5,
            element_threshold: 0.3,
            element_weight: 1.0,
            neighborhood_range: 0.9,
            scoring: ScoringFunction::default(),
            allow_self_match: false,
            parallel_threshold: 1000,
        }
    }
}

impl MatchConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.document_threshold.is_finite() {
            return Err(MatchError::InvalidConfig(format!(
                "document_threshold must be finite, got {}",
                self.document_threshold
            )));
        }
        if !self.element_threshold.is_finite() {
            return Err(MatchError::InvalidConfig(format!(
                "element_threshold must be finite, got {}",
                self.element_threshold
            )));
        }
        if !self.element_weight.is_finite() || self.element_weight < 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "element_weight must be finite and non-negative, got {}",
                self.element_weight
            )));
        }
        if !(0.0..=1.0).contains(&self.neighborhood_range) {
            return Err(MatchError::InvalidConfig(format!(
                "neighborhood_range must be within [0, 1], got {}",
                self.neighborhood_range
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.document_threshold, 0.5);
        assert_eq!(config.element_threshold, 0.3);
        assert_eq!(config.neighborhood_range, 0.9);
        assert!(matches!(
            config.scoring,
            ScoringFunction::ExponentialWeightedAverage
        ));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            MatchConfig::from_json(r#"{"document_threshold": 0.7, "scoring": "average"}"#).unwrap();
        assert_eq!(config.document_threshold, 0.7);
        assert_eq!(config.element_weight, 1.0);
        assert!(matches!(config.scoring, ScoringFunction::Average));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = MatchConfig::from_json(r#"{"neighborhood_range": 1.5}"#).unwrap_err();
        assert!(matches!(err, MatchError::InvalidConfig(_)));
        let err = MatchConfig::from_json(r#"{"element_weight": -2}"#).unwrap_err();
        assert!(matches!(err, MatchError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = MatchConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, MatchError::Serialization(_)));
    }

    #[test]
    fn test_json_roundtrip_of_defaults() {
        let json = MatchConfig::default().to_json().unwrap();
        let parsed = MatchConfig::from_json(&json).unwrap();
        assert_eq!(parsed.parallel_threshold, 1000);
    }
}
