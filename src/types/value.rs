//! UBJSON value types.

use std::fmt;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use super::HugeNumber;

/// Object payload: key/value pairs in wire order. Keys are not required to be
/// unique.
pub type UbjObject = Vec<(String, UbjValue)>;

/// A decoded UBJSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum UbjValue {
    Null,
    Bool(bool),
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Huge(HugeNumber),
    String(String),
    Array(Vec<UbjValue>),
    Object(UbjObject),
}

impl UbjValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a string reference, if it is a `String` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns any fixed-width integer widened to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(b) => Some(i64::from(*b)),
            Self::Int16(i) => Some(i64::from(*i)),
            Self::Int32(i) => Some(i64::from(*i)),
            Self::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns either float width widened to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float32(f) => Some(f64::from(*f)),
            Self::Float64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[UbjValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, UbjValue)]> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up the first entry with `key`, if this is an object.
    pub fn get(&self, key: &str) -> Option<&UbjValue> {
        self.as_object()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl From<bool> for UbjValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<u8> for UbjValue {
    fn from(b: u8) -> Self {
        Self::Byte(b)
    }
}

impl From<i16> for UbjValue {
    fn from(i: i16) -> Self {
        Self::Int16(i)
    }
}

impl From<i32> for UbjValue {
    fn from(i: i32) -> Self {
        Self::Int32(i)
    }
}

impl From<i64> for UbjValue {
    fn from(i: i64) -> Self {
        Self::Int64(i)
    }
}

impl From<f32> for UbjValue {
    fn from(f: f32) -> Self {
        Self::Float32(f)
    }
}

impl From<f64> for UbjValue {
    fn from(f: f64) -> Self {
        Self::Float64(f)
    }
}

impl From<HugeNumber> for UbjValue {
    fn from(n: HugeNumber) -> Self {
        Self::Huge(n)
    }
}

impl From<BigInt> for UbjValue {
    fn from(i: BigInt) -> Self {
        Self::Huge(HugeNumber::Integer(i))
    }
}

impl From<BigDecimal> for UbjValue {
    fn from(d: BigDecimal) -> Self {
        Self::Huge(HugeNumber::Decimal(d))
    }
}

impl From<String> for UbjValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for UbjValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Vec<UbjValue>> for UbjValue {
    fn from(v: Vec<UbjValue>) -> Self {
        Self::Array(v)
    }
}

impl From<UbjObject> for UbjValue {
    fn from(o: UbjObject) -> Self {
        Self::Object(o)
    }
}

impl<T: Into<UbjValue>> From<Option<T>> for UbjValue {
    fn from(o: Option<T>) -> Self {
        o.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for UbjValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Byte(b) => write!(f, "{b}"),
            Self::Int16(i) => write!(f, "{i}"),
            Self::Int32(i) => write!(f, "{i}"),
            Self::Int64(i) => write!(f, "{i}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Huge(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Object(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
