//! Pairwise matching of elements and documents

mod document;
mod element;

pub use document::DocumentMatcher;
pub use element::ElementMatcher;
