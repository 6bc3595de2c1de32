//! Matching entry points over in-memory document collections

use std::collections::HashMap;
use tracing::debug;

use crate::config::MatchConfig;
use crate::domain::{Document, Match};
use crate::error::Result;
use crate::group::group_matches;
use crate::matcher::DocumentMatcher;

/// Matches grouped by subject document
pub type MatchesByDocument<'a> = HashMap<&'a Document, Vec<Match<&'a Document>>>;

/// Matches grouped by subject document key
pub type MatchesByKey<'a> = HashMap<String, Vec<Match<&'a Document>>>;

fn by_subject<'a>(matches: Vec<Match<&'a Document>>) -> MatchesByDocument<'a> {
    let mut grouped: MatchesByDocument<'a> = HashMap::new();
    for m in matches {
        grouped.entry(*m.subject()).or_default().push(m);
    }
    grouped
}

fn by_key<'a>(matches: Vec<Match<&'a Document>>) -> MatchesByKey<'a> {
    let mut grouped: MatchesByKey<'a> = HashMap::new();
    for m in matches {
        grouped
            .entry(m.subject().key().to_string())
            .or_default()
            .push(m);
    }
    grouped
}

fn match_within<'a>(
    documents: &'a [Document],
    config: &MatchConfig,
) -> Result<Vec<Match<&'a Document>>> {
    DocumentMatcher::with_config(documents, config).match_documents(documents)
}

fn match_across<'a>(
    documents: &'a [Document],
    corpus: &'a [Document],
    config: &MatchConfig,
) -> Result<Vec<Match<&'a Document>>> {
    DocumentMatcher::with_config(corpus, config).match_documents(documents)
}

/// Find duplicates within one list. Only documents with at least one
/// match appear in the result.
pub fn match_all(documents: &[Document]) -> Result<MatchesByDocument<'_>> {
    match_all_with_config(documents, &MatchConfig::default())
}

pub fn match_all_with_config<'a>(
    documents: &'a [Document],
    config: &MatchConfig,
) -> Result<MatchesByDocument<'a>> {
    Ok(by_subject(match_within(documents, config)?))
}

/// [`match_all`] keyed by document key
pub fn match_all_by_id(documents: &[Document]) -> Result<MatchesByKey<'_>> {
    match_all_by_id_with_config(documents, &MatchConfig::default())
}

pub fn match_all_by_id_with_config<'a>(
    documents: &'a [Document],
    config: &MatchConfig,
) -> Result<MatchesByKey<'a>> {
    Ok(by_key(match_within(documents, config)?))
}

/// Duplicates within one list, merged into transitive groups
pub fn match_groups(documents: &[Document]) -> Result<Vec<Vec<Match<&Document>>>> {
    match_groups_with_config(documents, &MatchConfig::default())
}

pub fn match_groups_with_config<'a>(
    documents: &'a [Document],
    config: &MatchConfig,
) -> Result<Vec<Vec<Match<&'a Document>>>> {
    let matches = match_within(documents, config)?;
    debug!("Grouping {} matches", matches.len());
    Ok(group_matches(matches))
}

/// Match a single document against a corpus, best first
pub fn match_one<'a>(
    document: &'a Document,
    corpus: &'a [Document],
) -> Result<Vec<Match<&'a Document>>> {
    match_one_with_config(document, corpus, &MatchConfig::default())
}

pub fn match_one_with_config<'a>(
    document: &'a Document,
    corpus: &'a [Document],
    config: &MatchConfig,
) -> Result<Vec<Match<&'a Document>>> {
    DocumentMatcher::with_config(corpus, config).match_document(document, config.allow_self_match)
}

/// Match every document of `documents` against a separate corpus
pub fn match_with<'a>(
    documents: &'a [Document],
    corpus: &'a [Document],
) -> Result<MatchesByDocument<'a>> {
    match_with_config(documents, corpus, &MatchConfig::default())
}

pub fn match_with_config<'a>(
    documents: &'a [Document],
    corpus: &'a [Document],
    config: &MatchConfig,
) -> Result<MatchesByDocument<'a>> {
    Ok(by_subject(match_across(documents, corpus, config)?))
}

/// [`match_with`] keyed by document key
pub fn match_with_by_id<'a>(
    documents: &'a [Document],
    corpus: &'a [Document],
) -> Result<MatchesByKey<'a>> {
    match_with_by_id_with_config(documents, corpus, &MatchConfig::default())
}

pub fn match_with_by_id_with_config<'a>(
    documents: &'a [Document],
    corpus: &'a [Document],
    config: &MatchConfig,
) -> Result<MatchesByKey<'a>> {
    Ok(by_key(match_across(documents, corpus, config)?))
}

/// Match each document only against the documents before it in the list
pub fn match_incremental(documents: &[Document]) -> Result<MatchesByDocument<'_>> {
    match_incremental_with_config(documents, &MatchConfig::default())
}

pub fn match_incremental_with_config<'a>(
    documents: &'a [Document],
    config: &MatchConfig,
) -> Result<MatchesByDocument<'a>> {
    let mut matcher = DocumentMatcher::with_config(std::iter::empty(), config);
    let mut matches = Vec::new();
    for document in documents {
        matches.extend(matcher.match_then_add(document)?);
    }
    debug!(
        "Incrementally matched {} documents, {} matches",
        documents.len(),
        matches.len()
    );
    Ok(by_subject(matches))
}
