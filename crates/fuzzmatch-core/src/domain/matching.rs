//! Match records and the hierarchy contract they aggregate over

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::scoring::{ChildScore, MatchShape, ScoringFunction};

/// Something that can be compared against another of its kind and scored
/// from the scores of its children.
pub trait Matchable {
    fn weight(&self) -> f64;

    /// Number of children a perfect comparison against `other` would score
    fn child_count(&self, other: &Self) -> usize;

    /// Children present on one side only
    fn unmatched_child_count(&self, other: &Self) -> usize;

    fn scoring(&self) -> &ScoringFunction;
}

impl<T: Matchable + ?Sized> Matchable for &T {
    fn weight(&self) -> f64 {
        (**self).weight()
    }

    fn child_count(&self, other: &Self) -> usize {
        (**self).child_count(*other)
    }

    fn unmatched_child_count(&self, other: &Self) -> usize {
        (**self).unmatched_child_count(*other)
    }

    fn scoring(&self) -> &ScoringFunction {
        (**self).scoring()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub result: f64,
}

/// A directed (subject, candidate) pair with its score.
///
/// Two matches are equal when subject and candidate agree; the score is
/// not part of identity.
#[derive(Debug, Clone)]
pub struct Match<T> {
    subject: T,
    candidate: T,
    score: Score,
}

impl<T> Match<T> {
    pub fn with_score(subject: T, candidate: T, result: f64) -> Self {
        Self {
            subject,
            candidate,
            score: Score { result },
        }
    }

    pub fn subject(&self) -> &T {
        &self.subject
    }

    pub fn candidate(&self) -> &T {
        &self.candidate
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn result(&self) -> f64 {
        self.score.result
    }

    /// Same pair with the roles swapped
    pub fn is_reverse_of(&self, other: &Self) -> bool
    where
        T: PartialEq,
    {
        self.subject == other.candidate && self.candidate == other.subject
    }
}

impl<T: Matchable> Match<T> {
    /// Score `subject` against `candidate` from child matches. Children are
    /// reduced to the best score per distinct child subject first.
    pub fn aggregate<C>(subject: T, candidate: T, children: &[Match<C>]) -> Self
    where
        C: Matchable + Eq + Hash,
    {
        let shape = MatchShape {
            child_count: subject.child_count(&candidate),
            unmatched_child_count: subject.unmatched_child_count(&candidate),
        };
        let scores = best_per_subject(children);
        let result = subject.scoring().score(shape, &scores);
        Self::with_score(subject, candidate, result)
    }
}

fn best_per_subject<C: Matchable + Eq + Hash>(children: &[Match<C>]) -> Vec<ChildScore> {
    let mut positions: AHashMap<&C, usize> = AHashMap::with_capacity(children.len());
    let mut scores: Vec<ChildScore> = Vec::with_capacity(children.len());
    for child in children {
        match positions.get(&child.subject) {
            Some(&i) => {
                if child.result() > scores[i].result {
                    scores[i].result = child.result();
                }
            }
            None => {
                positions.insert(&child.subject, scores.len());
                scores.push(ChildScore {
                    result: child.result(),
                    weight: child.subject.weight(),
                });
            }
        }
    }
    scores
}

impl<T: PartialEq> PartialEq for Match<T> {
    fn eq(&self, other: &Self) -> bool {
        self.subject == other.subject && self.candidate == other.candidate
    }
}

impl<T: Eq> Eq for Match<T> {}

impl<T: Hash> Hash for Match<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subject.hash(state);
        self.candidate.hash(state);
    }
}

impl<T: fmt::Display> fmt::Display for Match<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Match{{subject={}, candidate={}, score={:.3}}}",
            self.subject, self.candidate, self.score.result
        )
    }
}
