//! Scalar element values
//!
//! Element values and token values share one sum type. Floating point kinds
//! compare and hash by bit pattern so they can key the token index; ordering
//! inside a kind is total, and values of different kinds order by kind rank.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A scalar field or token value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Text(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Calendar date, treated as UTC midnight when converted to an instant
    Date(NaiveDate),
    /// Date-time without zone, treated as UTC
    DateTime(NaiveDateTime),
    Instant(DateTime<Utc>),
}

impl Value {
    /// Short name of the value kind, used in error reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Date(_) => "date",
            Self::DateTime(_) => "date_time",
            Self::Instant(_) => "instant",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Text(_) => 0,
            Self::Int(_) => 1,
            Self::Long(_) => 2,
            Self::Float(_) => 3,
            Self::Double(_) => 4,
            Self::Date(_) => 5,
            Self::DateTime(_) => 6,
            Self::Instant(_) => 7,
        }
    }

    /// Text form of the value: borrowed for text, rendered for everything else
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// True only for a text value with no characters
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date(_) | Self::DateTime(_) | Self::Instant(_))
    }

    /// Milliseconds since the Unix epoch for temporal kinds
    pub fn epoch_millis(&self) -> Option<i64> {
        match self {
            Self::Date(d) => Some(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis()),
            Self::DateTime(dt) => Some(dt.and_utc().timestamp_millis()),
            Self::Instant(i) => Some(i.timestamp_millis()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Instant(a), Self::Instant(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Text(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::Long(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Double(v) => v.to_bits().hash(state),
            Self::Date(v) => v.hash(state),
            Self::DateTime(v) => v.hash(state),
            Self::Instant(v) => v.hash(state),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Long(a), Self::Long(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::DateTime(a), Self::DateTime(b)) => a.cmp(b),
            (Self::Instant(a), Self::Instant(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::Date(v) => write!(f, "{}", v),
            Self::DateTime(v) => write!(f, "{}", v),
            Self::Instant(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_equality_is_bitwise() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_ne!(Value::Double(0.0), Value::Double(-0.0));
        assert_eq!(Value::Float(1.5), Value::Float(1.5));
    }

    #[test]
    fn test_kinds_never_equal_across_variants() {
        assert_ne!(Value::Int(100), Value::Long(100));
        assert_ne!(Value::Text("100".into()), Value::Int(100));
    }

    #[test]
    fn test_ordering_within_and_across_kinds() {
        assert!(Value::Int(-5) < Value::Int(3));
        assert!(Value::Double(-0.5) < Value::Double(0.25));
        // kind rank decides across variants
        assert!(Value::Text("zzz".into()) < Value::Int(i32::MIN));
        assert!(Value::Double(f64::MAX) < Value::Date(NaiveDate::MIN));
    }

    #[test]
    fn test_epoch_millis_for_date_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(Value::Date(date).epoch_millis(), Some(86_400_000));
        assert_eq!(Value::Int(7).epoch_millis(), None);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Value::from("abc").to_text(), "abc");
        assert_eq!(Value::Int(42).to_text(), "42");
        assert!(Value::from("").is_empty_text());
        assert!(!Value::Int(0).is_empty_text());
    }
}
