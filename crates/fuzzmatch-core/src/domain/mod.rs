//! Domain model: values, elements, documents and match records

pub mod document;
pub mod element;
pub mod matching;
pub mod value;

pub use document::{Document, DocumentBuilder};
pub use element::{
    Classification, Element, ElementBuilder, ElementKey, ElementType, MatchType, Token,
};
pub use matching::{Match, Matchable, Score};
pub use value::Value;
