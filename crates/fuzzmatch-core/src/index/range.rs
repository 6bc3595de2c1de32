//! Tolerance windows for nearest-neighbor lookup

use chrono::{DateTime, Utc};

use crate::domain::Value;

/// Fixed baseline for ages: a 0.9 neighborhood spans one year either side
pub const AGE_BASELINE: f64 = 10.0;

/// Fixed baseline for temporal values, roughly five years in milliseconds
pub const DATE_BASELINE: f64 = 15777e7;

/// Inclusive `[lower, upper]` window of the same kind as the value it was
/// built around.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRange {
    lower: Value,
    upper: Value,
}

impl TokenRange {
    /// Window of `|baseline * (1 - pct)|` either side of `value`. The
    /// baseline defaults to the value itself. `None` when `value` has no
    /// ordering to build a window over.
    pub fn around(value: &Value, pct: f64, baseline: Option<f64>) -> Option<Self> {
        let bounds = |x: f64| {
            let tolerance = (baseline.unwrap_or(x) * (1.0 - pct)).abs();
            (x - tolerance, x + tolerance)
        };
        let (lower, upper) = match value {
            Value::Text(_) => return None,
            Value::Int(v) => {
                let (l, u) = bounds(f64::from(*v));
                (Value::Int(l as i32), Value::Int(u as i32))
            }
            Value::Long(v) => {
                let (l, u) = bounds(*v as f64);
                (Value::Long(l as i64), Value::Long(u as i64))
            }
            Value::Float(v) => {
                let (l, u) = bounds(f64::from(*v));
                (Value::Float(l as f32), Value::Float(u as f32))
            }
            Value::Double(v) => {
                let (l, u) = bounds(*v);
                (Value::Double(l), Value::Double(u))
            }
            Value::Instant(_) | Value::Date(_) | Value::DateTime(_) => {
                let millis = value.epoch_millis()? as f64;
                let (l, u) = bounds(millis);
                (
                    temporal_like(value, instant_at(l as i64, DateTime::<Utc>::MIN_UTC)),
                    temporal_like(value, instant_at(u as i64, DateTime::<Utc>::MAX_UTC)),
                )
            }
        };
        Some(Self { lower, upper })
    }

    pub fn lower(&self) -> &Value {
        &self.lower
    }

    pub fn upper(&self) -> &Value {
        &self.upper
    }

    /// True when nothing can fall inside: inverted bounds, or a NaN bound
    pub fn is_empty(&self) -> bool {
        is_nan(&self.lower) || is_nan(&self.upper) || self.lower > self.upper
    }

    pub fn contains(&self, value: &Value) -> bool {
        !self.is_empty() && !is_nan(value) && &self.lower <= value && value <= &self.upper
    }
}

fn is_nan(value: &Value) -> bool {
    match value {
        Value::Float(v) => v.is_nan(),
        Value::Double(v) => v.is_nan(),
        _ => false,
    }
}

fn instant_at(millis: i64, saturate: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or(saturate)
}

/// Convert an instant back to the kind of `like`. Dates keep the UTC
/// calendar day.
fn temporal_like(like: &Value, instant: DateTime<Utc>) -> Value {
    match like {
        Value::Date(_) => Value::Date(instant.date_naive()),
        Value::DateTime(_) => Value::DateTime(instant.naive_utc()),
        _ => Value::Instant(instant),
    }
}
