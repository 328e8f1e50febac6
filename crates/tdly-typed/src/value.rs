//! Loosely-typed property values
//!
//! [`PropertyValue`] is what stored documents are made of before any schema
//! has vouched for them. There is exactly one "nothing" value, [`PropertyValue::Absent`]:
//! format-level nulls are normalized away by [`PropertyValue::from_raw`] at the
//! deserialization boundary and never travel further into the pipeline.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use std::fmt::{self, Display, Formatter};

/// Ordered string-keyed mapping of property values
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// A loosely-typed value: primitive, nested mapping, nested sequence, or absent
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropertyValue {
    /// No value. Replaces every null found in raw input.
    #[default]
    Absent,
    /// Boolean primitive
    Bool(bool),
    /// Integral number primitive
    Integer(i64),
    /// Floating point number primitive
    Float(f64),
    /// String primitive
    String(String),
    /// Nested sequence
    Array(Vec<PropertyValue>),
    /// Nested mapping
    Object(PropertyMap),
}

/// Runtime kind of a [`PropertyValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Absent,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Lowercase name of the kind, as used in schema declarations
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PropertyValue {
    /// Convert a raw deserialized structure, replacing every null with [`PropertyValue::Absent`]
    ///
    /// Depth-first over nested sequences and mappings. Mapping order is kept.
    #[must_use]
    pub fn from_raw(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Null => Self::Absent,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                // u64 beyond i64::MAX and real floats both land here
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(values) => {
                Self::Array(values.into_iter().map(Self::from_raw).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from_raw(value)))
                    .collect(),
            ),
        }
    }

    /// Runtime kind of this value
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Absent => ValueKind::Absent,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Integer(_) | Self::Float(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value, widening integers
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[PropertyValue]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_object(&self) -> Option<&PropertyMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key on a mapping; anything else yields `None`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(values: Vec<PropertyValue>) -> Self {
        Self::Array(values)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(map: PropertyMap) -> Self {
        Self::Object(map)
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(raw: serde_json::Value) -> Self {
        Self::from_raw(raw)
    }
}

impl serde::Serialize for PropertyValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Absent => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Self::Object(map) => serialize_present_entries(map, serializer),
        }
    }
}

/// Serialize a property mapping, leaving out absent entries
pub fn serialize_present_entries<S>(map: &PropertyMap, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let present = map.values().filter(|v| !v.is_absent()).count();
    let mut out = serializer.serialize_map(Some(present))?;
    for (key, value) in map.iter().filter(|(_, v)| !v.is_absent()) {
        out.serialize_entry(key, value)?;
    }
    out.end()
}

impl<'de> serde::Deserialize<'de> for PropertyValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <serde_json::Value as serde::Deserialize>::deserialize(deserializer).map(Self::from_raw)
    }
}
