use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// A column value in the engine's argument representation.
///
/// Records convert their fields into `Value` when a plan is generated and
/// back out of `Value` when generated identifiers or timestamps are written
/// onto the record after execution.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer (all integer widths normalize to i64).
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point.
    Float(f64),
    /// Text.
    Str(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
    /// JSON document, serialized on binding.
    Json(serde_json::Value),
}

impl Value {
    /// Whether this value is the zero value for its type.
    ///
    /// Used to decide when a generated column still awaits its identifier and
    /// when a nullable column should bind NULL instead of a literal zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Int(v) => *v == 0,
            Self::UInt(v) => *v == 0,
            Self::Float(v) => *v == 0.0,
            Self::Str(s) => s.is_empty(),
            Self::Bytes(b) => b.is_empty(),
            Self::Timestamp(_) => false,
            Self::Json(v) => v.is_null(),
        }
    }

    /// The value as an `i64`, when it holds an integer.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            #[allow(clippy::cast_possible_wrap)]
            Self::UInt(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Renders the value as an inline SQL literal.
    ///
    /// Only the insert-select statement form embeds literals; every other
    /// form binds values through placeholders.
    pub(crate) fn write_literal(&self, sql: &mut String) {
        match self {
            Self::Null => sql.push_str("NULL"),
            Self::Bool(b) => sql.push_str(if *b { "TRUE" } else { "FALSE" }),
            Self::Int(v) => sql.push_str(&v.to_string()),
            Self::UInt(v) => sql.push_str(&v.to_string()),
            Self::Float(v) => sql.push_str(&v.to_string()),
            Self::Str(s) => write_quoted(sql, s),
            Self::Bytes(b) => {
                sql.push_str("X'");
                for byte in b {
                    sql.push_str(&format!("{byte:02X}"));
                }
                sql.push('\'');
            }
            Self::Timestamp(t) => {
                write_quoted(sql, &t.format("%Y-%m-%d %H:%M:%S%.6f").to_string());
            }
            Self::Json(v) => write_quoted(sql, &v.to_string()),
        }
    }
}

fn write_quoted(sql: &mut String, raw: &str) {
    sql.push('\'');
    for ch in raw.chars() {
        if ch == '\'' {
            sql.push('\'');
        }
        sql.push(ch);
    }
    sql.push('\'');
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}
from_int!(i8, i16, i32, i64);

macro_rules! from_uint {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::UInt(u64::from(v))
                }
            }
        )*
    };
}
from_uint!(u8, u16, u32, u64);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Trait for field types that can be written back from the engine's value
/// representation, used when generated identifiers, timestamps, and versions
/// are stamped onto a record after execution.
pub trait FromValue: Sized {
    /// Convert `value` into the field type.
    ///
    /// # Errors
    ///
    /// Returns a field-access error naming `column` if the value cannot be
    /// converted.
    fn from_value(column: &str, value: Value) -> Result<Self>;
}

impl FromValue for bool {
    fn from_value(column: &str, value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch(column, "bool", &other)),
        }
    }
}

macro_rules! from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(column: &str, value: Value) -> Result<Self> {
                    let raw = value
                        .as_i64()
                        .ok_or_else(|| mismatch(column, stringify!($ty), &value))?;
                    <$ty>::try_from(raw)
                        .map_err(|_| Error::field_access(column, "integer out of range"))
                }
            }
        )*
    };
}
from_value_int!(i8, i16, i32, u8, u16, u32, u64);

impl FromValue for i64 {
    fn from_value(column: &str, value: Value) -> Result<Self> {
        value.as_i64().ok_or_else(|| mismatch(column, "i64", &value))
    }
}

impl FromValue for f64 {
    fn from_value(column: &str, value: Value) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(v),
            other => Err(mismatch(column, "f64", &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(column: &str, value: Value) -> Result<Self> {
        match value {
            Value::Str(v) => Ok(v),
            other => Err(mismatch(column, "string", &other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(column: &str, value: Value) -> Result<Self> {
        match value {
            Value::Bytes(v) => Ok(v),
            other => Err(mismatch(column, "bytes", &other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(column: &str, value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(v) => Ok(v),
            other => Err(mismatch(column, "timestamp", &other)),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(column: &str, value: Value) -> Result<Self> {
        match value {
            Value::Json(v) => Ok(v),
            Value::Str(raw) => serde_json::from_str(&raw)
                .map_err(|err| Error::field_access(column, err.to_string())),
            other => Err(mismatch(column, "json", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(column: &str, value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(column, other).map(Some),
        }
    }
}

fn mismatch(column: &str, expected: &str, got: &Value) -> Error {
    Error::field_access(column, format!("expected {expected} value, got {got:?}"))
}
