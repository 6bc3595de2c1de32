//! Shared helpers for integration tests

use fuzzmatch_core::{Document, ElementBuilder, Value};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a test-friendly subscriber once. Honors RUST_LOG.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_test_writer())
        .try_init();
}

/// One document per value, keyed "1", "2", ... in input order
#[allow(dead_code)]
pub fn single_field_documents<V>(
    values: impl IntoIterator<Item = V>,
    field: impl Fn(Value) -> ElementBuilder,
) -> Vec<Document>
where
    V: Into<Value>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            Document::builder((i + 1).to_string())
                .element(field(value.into()))
                .build()
                .unwrap()
        })
        .collect()
}

/// First element value of a document, as an i32
#[allow(dead_code)]
pub fn int_value(document: &Document) -> i32 {
    match document.elements()[0].value() {
        Value::Int(v) => *v,
        other => panic!("expected int, got {:?}", other),
    }
}
