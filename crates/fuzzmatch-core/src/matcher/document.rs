//! Document-level matching
//!
//! Every matchable element of the indexed corpus goes into one
//! [`ElementMatcher`]. A subject document's element matches are grouped by
//! candidate document and aggregated with the subject's scoring function.

use ahash::AHashMap;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::element::ElementMatcher;
use crate::config::MatchConfig;
use crate::domain::{Document, Element, Match};
use crate::error::Result;

pub struct DocumentMatcher<'a> {
    elements: ElementMatcher<'a>,
    documents: AHashMap<&'a str, &'a Document>,
    allow_self_match: bool,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel_threshold: usize,
}

impl<'a> DocumentMatcher<'a> {
    /// Index `documents` with the default configuration
    pub fn new(documents: impl IntoIterator<Item = &'a Document>) -> Self {
        Self::with_config(documents, &MatchConfig::default())
    }

    pub fn with_config(
        documents: impl IntoIterator<Item = &'a Document>,
        config: &MatchConfig,
    ) -> Self {
        let mut matcher = Self {
            elements: ElementMatcher::new(),
            documents: AHashMap::new(),
            allow_self_match: config.allow_self_match,
            parallel_threshold: config.parallel_threshold,
        };
        for document in documents {
            matcher.add(document);
        }
        debug!(
            "Indexed {} documents, {} elements across {} classifications",
            matcher.documents.len(),
            matcher.elements.len(),
            matcher.elements.index().len()
        );
        matcher
    }

    pub fn add(&mut self, document: &'a Document) {
        self.documents.insert(document.key(), document);
        for element in document.matchable_elements() {
            self.elements.add(element);
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Matches for one subject above its threshold, best first. A document
    /// never matches itself unless `allow_self` is set.
    pub fn match_document(
        &self,
        subject: &'a Document,
        allow_self: bool,
    ) -> Result<Vec<Match<&'a Document>>> {
        let mut groups: Vec<(&'a Document, Vec<Match<&'a Element>>)> = Vec::new();
        let mut positions: AHashMap<&str, usize> = AHashMap::new();

        for element in subject.matchable_elements() {
            for found in self.elements.match_element(element)? {
                let owner = found.candidate().document_key();
                if !allow_self && owner == subject.key() {
                    continue;
                }
                let Some(&candidate) = self.documents.get(owner) else {
                    continue;
                };
                let slot = *positions.entry(candidate.key()).or_insert_with(|| {
                    groups.push((candidate, Vec::new()));
                    groups.len() - 1
                });
                groups[slot].1.push(found);
            }
        }

        let mut matches: Vec<Match<&'a Document>> = groups
            .into_iter()
            .map(|(candidate, children)| Match::aggregate(subject, candidate, &children))
            .filter(|m| m.result() > subject.threshold())
            .collect();
        matches.sort_by(|a, b| {
            b.result()
                .total_cmp(&a.result())
                .then_with(|| a.candidate().key().cmp(b.candidate().key()))
        });
        Ok(matches)
    }

    /// Match every document in `subjects` against the index
    pub fn match_documents(
        &self,
        subjects: &'a [Document],
    ) -> Result<Vec<Match<&'a Document>>> {
        #[cfg(feature = "parallel")]
        if subjects.len() >= self.parallel_threshold {
            debug!("Matching {} documents in parallel", subjects.len());
            let per_subject = subjects
                .par_iter()
                .map(|subject| self.match_document(subject, self.allow_self_match))
                .collect::<Result<Vec<_>>>()?;
            return Ok(per_subject.into_iter().flatten().collect());
        }

        let mut matches = Vec::new();
        for subject in subjects {
            matches.extend(self.match_document(subject, self.allow_self_match)?);
        }
        debug!(
            "Matched {} documents, {} matches",
            subjects.len(),
            matches.len()
        );
        Ok(matches)
    }

    /// Match against the documents added so far, then add `document`
    pub fn match_then_add(
        &mut self,
        document: &'a Document,
    ) -> Result<Vec<Match<&'a Document>>> {
        let matches = self.match_document(document, self.allow_self_match)?;
        self.add(document);
        Ok(matches)
    }
}
