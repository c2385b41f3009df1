//! The serializable view: how composite host values expose their fields.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use super::UbjValue;

/// A composite value that can be written as a UBJSON object.
///
/// Implementors list their members as ordered key/field pairs; the encoder
/// writes them as a known-length object in that order.
///
/// ```
/// use std::borrow::Cow;
/// use ubjsonr::types::{Field, SerializableView};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl SerializableView for Point {
///     fn entries(&self) -> Vec<(Cow<'_, str>, Field<'_>)> {
///         vec![("x".into(), Field::value(self.x)), ("y".into(), Field::value(self.y))]
///     }
/// }
/// ```
pub trait SerializableView {
    fn entries(&self) -> Vec<(Cow<'_, str>, Field<'_>)>;
}

/// A single member of a [`SerializableView`].
pub enum Field<'a> {
    /// An owned value tree.
    Value(UbjValue),
    /// A borrowed value tree.
    Ref(&'a UbjValue),
    /// A nested composite, written as an object.
    View(&'a dyn SerializableView),
    /// A sequence of members, written as an array.
    Array(Vec<Field<'a>>),
    /// A member with no UBJSON representation (a callback, a handle). Writing
    /// it fails with `UnsupportedValueType` naming the given kind.
    Unsupported(&'static str),
}

impl<'a> Field<'a> {
    pub fn value(v: impl Into<UbjValue>) -> Self {
        Self::Value(v.into())
    }

    pub fn view(v: &'a dyn SerializableView) -> Self {
        Self::View(v)
    }
}

impl SerializableView for BTreeMap<String, UbjValue> {
    fn entries(&self) -> Vec<(Cow<'_, str>, Field<'_>)> {
        self.iter()
            .map(|(k, v)| (Cow::Borrowed(k.as_str()), Field::Ref(v)))
            .collect()
    }
}

/// Iteration order of the map; not stable across runs.
impl SerializableView for HashMap<String, UbjValue> {
    fn entries(&self) -> Vec<(Cow<'_, str>, Field<'_>)> {
        self.iter()
            .map(|(k, v)| (Cow::Borrowed(k.as_str()), Field::Ref(v)))
            .collect()
    }
}
