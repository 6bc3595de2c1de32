//! fuzzmatch core engine
//!
//! Record linkage over in-memory documents: typed fields are normalized and
//! tokenized, tokens go into an inverted index, element matches come from
//! shared tokens, and element scores roll up into document scores through a
//! configurable aggregation. Pairwise document matches can then be merged
//! into transitive groups.
//!
//! # Features
//!
//! - `native` - Enable all native optimizations (parallel, phonetic)
//! - `parallel` - Match large corpora on the rayon thread pool
//! - `phonetic` - Double Metaphone word tokenizer
//!
//! # Example
//!
//! ```rust
//! use fuzzmatch_core::{match_all_by_id, Document};
//!
//! let documents = vec![
//!     Document::builder("1")
//!         .name("James Parker")
//!         .address("123 new st. Minneapolis MN")
//!         .phone("(123) 234 2345")
//!         .build()
//!         .unwrap(),
//!     Document::builder("2")
//!         .name("James")
//!         .address("123 new Street, minneapolis mn")
//!         .phone("123-234-2345")
//!         .build()
//!         .unwrap(),
//! ];
//!
//! let matches = match_all_by_id(&documents).unwrap();
//! assert_eq!(matches["1"][0].candidate().key(), "2");
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod group;
pub mod index;
pub mod matcher;
pub mod normalize;
pub mod scoring;
pub mod service;
pub mod tokenize;

// Re-export main types at crate root
pub use config::MatchConfig;
pub use domain::{
    Classification, Document, DocumentBuilder, Element, ElementBuilder, ElementKey, ElementType,
    Match, MatchType, Matchable, Score, Token, Value,
};
pub use error::{MatchError, Result};
pub use group::group_matches;
pub use index::{TokenIndex, TokenRange};
pub use matcher::{DocumentMatcher, ElementMatcher};
pub use normalize::{Dictionary, NormalizeFn};
pub use scoring::{ChildScore, MatchShape, ScoringFunction};
pub use service::{
    match_all, match_all_by_id, match_all_by_id_with_config, match_all_with_config, match_groups,
    match_groups_with_config, match_incremental, match_incremental_with_config, match_one,
    match_one_with_config, match_with, match_with_by_id, match_with_by_id_with_config,
    match_with_config, MatchesByDocument, MatchesByKey,
};
pub use tokenize::TokenizeFn;
