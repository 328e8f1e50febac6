//! Error types for property schemas
//!
//! - [`PropertyError`]: a property map failed validation or a lookup
//! - [`SchemaError`]: a schema could not be loaded from its wire shape

use crate::schema::PrimitiveKind;
use tdly_typed::ValueKind;

/// Property validation and lookup failures
///
/// `Missing` and `WrongType` carry the path of the offending property.
/// Nested validation prepends each enclosing key or `[index]` as the error
/// travels outwards, so the caller sees the full path (`items[1].id`).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    /// A required property is absent
    #[error("required property missing: {property_name}")]
    Missing { property_name: String },

    /// A property does not have the declared shape
    #[error("property {property_name}: expected {expected}, found {actual}")]
    WrongType {
        property_name: String,
        expected: String,
        actual: ValueKind,
    },

    /// Typed lookup of a key the schema declares differently
    #[error("property {key} requested as {requested} but declared as {declared}")]
    DeclaredKindMismatch {
        key: String,
        requested: PrimitiveKind,
        declared: String,
    },

    /// Dotted lookup beyond the first segment
    #[error("multi-segment property lookup is not supported: {key}")]
    UnsupportedPath { key: String },
}

impl PropertyError {
    /// Create a missing-property error
    pub fn missing(property_name: impl Into<String>) -> Self {
        Self::Missing {
            property_name: property_name.into(),
        }
    }

    /// Create a wrong-type error with an empty path
    pub fn wrong_type(expected: impl Into<String>, actual: ValueKind) -> Self {
        Self::WrongType {
            property_name: String::new(),
            expected: expected.into(),
            actual,
        }
    }

    /// Path of the offending property, if this error has one
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        match self {
            Self::Missing { property_name } | Self::WrongType { property_name, .. } => {
                Some(property_name)
            }
            Self::DeclaredKindMismatch { .. } | Self::UnsupportedPath { .. } => None,
        }
    }

    /// Prepend an enclosing segment (a key, or `[index]`) to the path
    pub fn prepend(&mut self, segment: &str) {
        if let Self::Missing { property_name } | Self::WrongType { property_name, .. } = self {
            *property_name = join_segment(segment, property_name);
        }
    }

    /// Owned variant of [`PropertyError::prepend`]
    #[must_use]
    pub fn prepended(mut self, segment: &str) -> Self {
        self.prepend(segment);
        self
    }
}

fn join_segment(segment: &str, rest: &str) -> String {
    if rest.is_empty() {
        segment.to_string()
    } else if rest.starts_with('[') {
        format!("{segment}{rest}")
    } else {
        format!("{segment}.{rest}")
    }
}

/// Schema loading failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// Top-level schema is not a mapping
    #[error("schema must be a mapping of property keys to rules")]
    NotAMapping,

    /// Rule mapping has no `kind` (or `type` / `primitive`) string
    #[error("rule is missing its kind")]
    MissingKind,

    /// Kind is not a primitive, `array` or `object`
    #[error("unknown property kind: {0}")]
    UnknownKind(String),

    /// `required` is present but not a boolean
    #[error("`required` must be a boolean")]
    InvalidRequired,

    /// Children do not fit the collection kind
    #[error("invalid children for {kind} rule")]
    InvalidChildren { kind: String },

    /// Rule is neither a kind name nor a mapping
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    /// Failure while loading the rule for `key`
    #[error("{key}: {source}")]
    AtKey {
        key: String,
        #[source]
        source: Box<SchemaError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_builds_outer_to_inner_path() {
        let err = PropertyError::missing("id").prepended("[1]").prepended("items");
        assert_eq!(err.property_name(), Some("items[1].id"));
    }

    #[test]
    fn prepend_onto_empty_path() {
        let err = PropertyError::wrong_type("string", ValueKind::Number)
            .prepended("[0]")
            .prepended("tags");
        assert_eq!(err.property_name(), Some("tags[0]"));
    }

    #[test]
    fn nested_objects_join_with_dots() {
        let err = PropertyError::missing("c").prepended("b").prepended("a");
        assert_eq!(err.property_name(), Some("a.b.c"));
    }

    #[test]
    fn lookup_errors_have_no_path() {
        let mut err = PropertyError::UnsupportedPath { key: "a.b".into() };
        err.prepend("x");
        assert_eq!(err.property_name(), None);
        assert_eq!(err.to_string(), "multi-segment property lookup is not supported: a.b");
    }

    #[test]
    fn display() {
        let err = PropertyError::WrongType {
            property_name: "guid".into(),
            expected: "string".into(),
            actual: ValueKind::Number,
        };
        assert_eq!(err.to_string(), "property guid: expected string, found number");
    }
}
