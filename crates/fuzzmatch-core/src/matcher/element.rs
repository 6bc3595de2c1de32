//! Element-level matching through shared tokens

use ahash::AHashMap;
use tracing::trace;

use crate::domain::{Element, ElementKey, Match};
use crate::error::Result;
use crate::index::TokenIndex;

/// Matches elements against every element added so far.
///
/// A candidate's score is the number of query tokens that hit it divided
/// by the larger of the two token counts. Candidates at or below the query
/// element's threshold are dropped.
#[derive(Debug, Default)]
pub struct ElementMatcher<'a> {
    index: TokenIndex,
    elements: AHashMap<ElementKey, &'a Element>,
}

impl<'a> ElementMatcher<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: &'a Element) {
        self.index.insert(element);
        self.elements.insert(element.key().clone(), element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn index(&self) -> &TokenIndex {
        &self.index
    }

    /// Matches ordered by descending score, then candidate key
    pub fn match_element(&self, element: &'a Element) -> Result<Vec<Match<&'a Element>>> {
        let mut hits: AHashMap<&ElementKey, usize> = AHashMap::new();
        for token in element.tokens() {
            for owner in self.index.lookup(element, token.value())? {
                *hits.entry(owner).or_insert(0) += 1;
            }
        }

        let mut matches: Vec<Match<&'a Element>> = hits
            .into_iter()
            .filter_map(|(owner, count)| {
                let candidate = *self.elements.get(owner)?;
                let score = element.score(count, candidate);
                (score > element.threshold())
                    .then(|| Match::with_score(element, candidate, score))
            })
            .collect();
        matches.sort_by(|a, b| {
            b.result()
                .total_cmp(&a.result())
                .then_with(|| a.candidate().key().cmp(b.candidate().key()))
        });

        trace!(
            "{} matched {} candidates with {} tokens",
            element.key(),
            matches.len(),
            element.tokens().len()
        );
        Ok(matches)
    }

    /// Match against what was added before, then add `element`
    pub fn match_then_add(&mut self, element: &'a Element) -> Result<Vec<Match<&'a Element>>> {
        let matches = self.match_element(element)?;
        self.add(element);
        Ok(matches)
    }
}
