//! Property schema data model
//!
//! A [`PropertySchema`] maps property keys to [`PropertyRule`]s. Schemas are
//! plain data: they can be assembled in code with the builder helpers or
//! loaded from any serde format using the wire shape
//!
//! ```text
//! { key: "string" | "number" | "boolean"
//!      | { kind: "string"|"number"|"boolean"|"object"|"array",
//!          children: <schema or rule> | "any",
//!          required: bool } }
//! ```
//!
//! `type` and `primitive` are accepted as spellings of `kind`.

use crate::error::SchemaError;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};
use tdly_typed::PropertyValue;

/// Wildcard accepted in place of concrete children
pub const ANY_CHILDREN: &str = "any";

/// Primitive property kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
}

impl PrimitiveKind {
    /// Parse a primitive kind name
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Whether the runtime kind of `value` is this primitive kind
    #[must_use]
    pub const fn matches(self, value: &PropertyValue) -> bool {
        matches!(
            (self, value),
            (Self::String, PropertyValue::String(_))
                | (Self::Number, PropertyValue::Integer(_) | PropertyValue::Float(_))
                | (Self::Boolean, PropertyValue::Bool(_))
        )
    }
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Children of a collection rule: either unconstrained or a concrete rule/schema
#[derive(Debug, Clone, PartialEq)]
pub enum ChildRule<T> {
    /// Only the collection kind itself is checked
    Any,
    /// Every child is validated
    Typed(T),
}

/// Rule for a single property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyRule {
    Primitive {
        kind: PrimitiveKind,
        required: bool,
    },
    Array {
        children: ChildRule<Box<PropertyRule>>,
        required: bool,
    },
    Object {
        children: ChildRule<PropertySchema>,
        required: bool,
    },
}

impl PropertyRule {
    #[inline]
    #[must_use]
    pub const fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive {
            kind,
            required: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    #[inline]
    #[must_use]
    pub const fn number() -> Self {
        Self::primitive(PrimitiveKind::Number)
    }

    #[inline]
    #[must_use]
    pub const fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Boolean)
    }

    /// Sequence whose elements all satisfy `rule`
    #[inline]
    #[must_use]
    pub fn array_of(rule: PropertyRule) -> Self {
        Self::Array {
            children: ChildRule::Typed(Box::new(rule)),
            required: false,
        }
    }

    /// Sequence with unconstrained elements
    #[inline]
    #[must_use]
    pub const fn any_array() -> Self {
        Self::Array {
            children: ChildRule::Any,
            required: false,
        }
    }

    /// Mapping validated against a nested schema
    #[inline]
    #[must_use]
    pub fn object_of(schema: PropertySchema) -> Self {
        Self::Object {
            children: ChildRule::Typed(schema),
            required: false,
        }
    }

    /// Mapping with unconstrained entries
    #[inline]
    #[must_use]
    pub const fn any_object() -> Self {
        Self::Object {
            children: ChildRule::Any,
            required: false,
        }
    }

    /// Mark this rule as required
    #[must_use]
    pub fn required(mut self) -> Self {
        match &mut self {
            Self::Primitive { required, .. }
            | Self::Array { required, .. }
            | Self::Object { required, .. } => *required = true,
        }
        self
    }

    #[inline]
    #[must_use]
    pub const fn is_required(&self) -> bool {
        match self {
            Self::Primitive { required, .. }
            | Self::Array { required, .. }
            | Self::Object { required, .. } => *required,
        }
    }

    /// Whether this rule declares the primitive `kind`
    #[inline]
    #[must_use]
    pub fn is_primitive_of(&self, kind: PrimitiveKind) -> bool {
        matches!(self, Self::Primitive { kind: k, .. } if *k == kind)
    }

    /// Name of the kind this rule expects
    #[must_use]
    pub const fn expected_kind(&self) -> &'static str {
        match self {
            Self::Primitive { kind, .. } => kind.as_str(),
            Self::Array { .. } => "array",
            Self::Object { .. } => "object",
        }
    }

    /// Load a rule from its wire shape
    ///
    /// # Errors
    /// Returns [`SchemaError`] for unknown kinds, malformed `required`
    /// flags or children that do not fit the kind.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::String(name) => Self::from_kind_name(name, None, false),
            Value::Object(meta) => {
                let kind = ["kind", "type", "primitive"]
                    .iter()
                    .find_map(|k| meta.get(*k))
                    .ok_or(SchemaError::MissingKind)?
                    .as_str()
                    .ok_or(SchemaError::MissingKind)?;
                let required = match meta.get("required") {
                    None | Some(Value::Null) => false,
                    Some(Value::Bool(b)) => *b,
                    Some(_) => return Err(SchemaError::InvalidRequired),
                };
                Self::from_kind_name(kind, meta.get("children"), required)
            }
            other => Err(SchemaError::InvalidRule(other.to_string())),
        }
    }

    fn from_kind_name(kind: &str, children: Option<&Value>, required: bool) -> Result<Self, SchemaError> {
        if let Some(primitive) = PrimitiveKind::parse(kind) {
            return Ok(Self::Primitive {
                kind: primitive,
                required,
            });
        }
        let unconstrained = match children {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s == ANY_CHILDREN,
            Some(_) => false,
        };
        match (kind, children) {
            ("array", _) if unconstrained => Ok(Self::Array {
                children: ChildRule::Any,
                required,
            }),
            ("array", Some(child)) => Ok(Self::Array {
                children: ChildRule::Typed(Box::new(Self::from_value(child)?)),
                required,
            }),
            ("object", _) if unconstrained => Ok(Self::Object {
                children: ChildRule::Any,
                required,
            }),
            ("object", Some(Value::Object(map))) => Ok(Self::Object {
                children: ChildRule::Typed(PropertySchema::from_map(map)?),
                required,
            }),
            ("array" | "object", _) => Err(SchemaError::InvalidChildren {
                kind: kind.to_string(),
            }),
            (other, _) => Err(SchemaError::UnknownKind(other.to_string())),
        }
    }

    /// Render this rule in its wire shape
    #[must_use]
    pub fn to_value(&self) -> Value {
        let (kind, children) = match self {
            Self::Primitive { kind, required: false } => return Value::String(kind.as_str().into()),
            Self::Primitive { kind, .. } => (kind.as_str(), None),
            Self::Array { children, .. } => (
                "array",
                Some(match children {
                    ChildRule::Any => Value::String(ANY_CHILDREN.into()),
                    ChildRule::Typed(rule) => rule.to_value(),
                }),
            ),
            Self::Object { children, .. } => (
                "object",
                Some(match children {
                    ChildRule::Any => Value::String(ANY_CHILDREN.into()),
                    ChildRule::Typed(schema) => schema.to_value(),
                }),
            ),
        };
        let mut meta = Map::new();
        meta.insert("kind".into(), Value::String(kind.into()));
        if let Some(children) = children {
            meta.insert("children".into(), children);
        }
        if self.is_required() {
            meta.insert("required".into(), Value::Bool(true));
        }
        Value::Object(meta)
    }
}

impl TryFrom<Value> for PropertyRule {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

impl serde::Serialize for PropertyRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.to_value(), serializer)
    }
}

impl<'de> serde::Deserialize<'de> for PropertyRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <Value as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Ordered mapping from property key to rule
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PropertySchema {
    rules: IndexMap<String, PropertyRule>,
}

impl PropertySchema {
    /// Create empty schema
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule (builder style)
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, rule: PropertyRule) -> Self {
        self.insert(key, rule);
        self
    }

    /// Add or replace a rule
    pub fn insert(&mut self, key: impl Into<String>, rule: PropertyRule) -> Option<PropertyRule> {
        self.rules.insert(key.into(), rule)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyRule> {
        self.rules.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Load a schema from its wire shape
    ///
    /// # Errors
    /// Returns [`SchemaError::NotAMapping`] if `value` is not a mapping, or the
    /// first rule error annotated with its key.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Err(SchemaError::NotAMapping),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self, SchemaError> {
        let mut schema = Self::new();
        for (key, raw) in map {
            let rule = PropertyRule::from_value(raw).map_err(|source| SchemaError::AtKey {
                key: key.clone(),
                source: Box::new(source),
            })?;
            schema.insert(key.clone(), rule);
        }
        Ok(schema)
    }

    /// Render this schema in its wire shape
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.rules
                .iter()
                .map(|(k, rule)| (k.clone(), rule.to_value()))
                .collect(),
        )
    }
}

impl FromIterator<(String, PropertyRule)> for PropertySchema {
    fn from_iter<I: IntoIterator<Item = (String, PropertyRule)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
