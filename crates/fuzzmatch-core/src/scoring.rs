//! Aggregation formulas turning child scores into one parent score

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const EXPONENT: f64 = 1.5;
const NEAR_PERFECT: f64 = 0.9;
const UNMATCHED_CHILD_SCORE: f64 = 0.5;

/// Child and unmatched counts of the pair being scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchShape {
    pub child_count: usize,
    pub unmatched_child_count: usize,
}

/// One child's best score and the weight of the child that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildScore {
    pub result: f64,
    pub weight: f64,
}

pub type CustomScoring = Arc<dyn Fn(MatchShape, &[ChildScore]) -> f64 + Send + Sync>;

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFunction {
    SimpleAverage,
    Average,
    WeightedAverage,
    ExponentialAverage,
    #[default]
    ExponentialWeightedAverage,
    #[serde(skip)]
    Custom(CustomScoring),
}

impl ScoringFunction {
    pub fn custom(f: impl Fn(MatchShape, &[ChildScore]) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    pub fn score(&self, shape: MatchShape, children: &[ChildScore]) -> f64 {
        match self {
            Self::SimpleAverage => simple_average(shape, children),
            Self::Average => average(shape, children),
            Self::WeightedAverage => weighted_average(shape, children),
            Self::ExponentialAverage => exponential_average(shape, children),
            Self::ExponentialWeightedAverage => exponential_weighted_average(shape, children),
            Self::Custom(f) => f(shape, children),
        }
    }
}

impl fmt::Debug for ScoringFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimpleAverage => f.write_str("SimpleAverage"),
            Self::Average => f.write_str("Average"),
            Self::WeightedAverage => f.write_str("WeightedAverage"),
            Self::ExponentialAverage => f.write_str("ExponentialAverage"),
            Self::ExponentialWeightedAverage => f.write_str("ExponentialWeightedAverage"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn sum_results<'a>(children: impl IntoIterator<Item = &'a ChildScore>) -> f64 {
    children.into_iter().map(|c| c.result).sum()
}

fn sum_weighted<'a>(children: impl IntoIterator<Item = &'a ChildScore>) -> f64 {
    children.into_iter().map(|c| c.result * c.weight).sum()
}

fn sum_weights<'a>(children: impl IntoIterator<Item = &'a ChildScore>) -> f64 {
    children.into_iter().map(|c| c.weight).sum()
}

fn unmatched_credit(shape: MatchShape) -> f64 {
    shape.unmatched_child_count as f64 * UNMATCHED_CHILD_SCORE
}

fn partition(children: &[ChildScore]) -> (Vec<&ChildScore>, Vec<&ChildScore>) {
    children.iter().partition(|c| c.result >= NEAR_PERFECT)
}

/// `sum(result) / child_count`
pub fn simple_average(shape: MatchShape, children: &[ChildScore]) -> f64 {
    ratio(sum_results(children), shape.child_count as f64)
}

/// Simple average with half credit for every unmatched child
pub fn average(shape: MatchShape, children: &[ChildScore]) -> f64 {
    ratio(
        sum_results(children) + unmatched_credit(shape),
        shape.child_count as f64,
    )
}

/// Weighted results; children without a score count with weight 1
pub fn weighted_average(shape: MatchShape, children: &[ChildScore]) -> f64 {
    let numerator = sum_weighted(children) + unmatched_credit(shape);
    let denominator =
        sum_weights(children) + shape.child_count as f64 - children.len() as f64;
    ratio(numerator, denominator)
}

/// Average that boosts several near-perfect children super-linearly
pub fn exponential_average(shape: MatchShape, children: &[ChildScore]) -> f64 {
    let (perfect, rest) = partition(children);
    let perfect_sum = sum_results(perfect.iter().copied());
    if perfect.len() > 1 && perfect_sum > 1.0 {
        let numerator =
            perfect_sum.powf(EXPONENT) + sum_results(rest.iter().copied()) + unmatched_credit(shape);
        let denominator = (perfect.len() as f64).powf(EXPONENT) + shape.child_count as f64
            - perfect.len() as f64;
        ratio(numerator, denominator)
    } else {
        average(shape, children)
    }
}

/// Weighted counterpart of [`exponential_average`]
pub fn exponential_weighted_average(shape: MatchShape, children: &[ChildScore]) -> f64 {
    let (perfect, rest) = partition(children);
    let perfect_sum = sum_weighted(perfect.iter().copied());
    if perfect.len() > 1 && perfect_sum > 1.0 {
        let numerator = perfect_sum.powf(EXPONENT)
            + sum_weighted(rest.iter().copied())
            + unmatched_credit(shape);
        let denominator = sum_weights(perfect.iter().copied()).powf(EXPONENT)
            + sum_weights(rest.iter().copied())
            + shape.child_count as f64
            - children.len() as f64;
        ratio(numerator, denominator)
    } else {
        weighted_average(shape, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(result: f64, weight: f64) -> ChildScore {
        ChildScore { result, weight }
    }

    fn shape(child_count: usize, unmatched_child_count: usize) -> MatchShape {
        MatchShape {
            child_count,
            unmatched_child_count,
        }
    }

    fn round3(v: f64) -> f64 {
        (v * 1000.0).round() / 1000.0
    }

    #[test]
    fn test_simple_average() {
        let children = [child(0.5, 1.0), child(1.0, 1.0)];
        assert_eq!(simple_average(shape(3, 0), &children), 0.5);
    }

    #[test]
    fn test_average() {
        let children = [child(0.66, 1.0), child(1.0, 1.0)];
        assert_eq!(round3(average(shape(4, 0), &children)), 0.415);
    }

    #[test]
    fn test_average_with_unmatched_children() {
        let children = [child(1.0, 1.0), child(1.0, 1.0)];
        assert_eq!(round3(average(shape(4, 2), &children)), 0.75);
        let children = [child(0.5, 1.0), child(1.0, 1.0)];
        assert_eq!(round3(average(shape(4, 2), &children)), 0.625);
    }

    #[test]
    fn test_weighted_average() {
        let children = [child(1.0, 1.0), child(1.0, 2.0)];
        assert_eq!(round3(weighted_average(shape(4, 2), &children)), 0.8);
    }

    #[test]
    fn test_exponential_average() {
        let children = [child(1.0, 1.0), child(1.0, 2.0)];
        assert_eq!(round3(exponential_average(shape(4, 2), &children)), 0.793);
    }

    #[test]
    fn test_exponential_weighted_average() {
        let children = [child(1.0, 1.0), child(1.0, 2.0)];
        assert_eq!(
            round3(exponential_weighted_average(shape(4, 2), &children)),
            0.861
        );
    }

    #[test]
    fn test_exponential_falls_back_without_two_perfect_children() {
        let children = [child(1.0, 1.0), child(0.4, 1.0)];
        assert_eq!(
            exponential_average(shape(3, 1), &children),
            average(shape(3, 1), &children)
        );
        assert_eq!(
            exponential_weighted_average(shape(3, 1), &children),
            weighted_average(shape(3, 1), &children)
        );
    }

    #[test]
    fn test_zero_denominator_scores_zero() {
        assert_eq!(simple_average(shape(0, 0), &[]), 0.0);
        assert_eq!(weighted_average(shape(0, 0), &[]), 0.0);
    }

    #[test]
    fn test_custom_scoring() {
        let max = ScoringFunction::custom(|_, children| {
            children.iter().map(|c| c.result).fold(0.0, f64::max)
        });
        let children = [child(0.2, 1.0), child(0.7, 1.0)];
        assert_eq!(max.score(shape(2, 0), &children), 0.7);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ScoringFunction::ExponentialWeightedAverage).unwrap();
        assert_eq!(json, "\"exponential_weighted_average\"");
        let parsed: ScoringFunction = serde_json::from_str("\"average\"").unwrap();
        assert!(matches!(parsed, ScoringFunction::Average));
    }
}
