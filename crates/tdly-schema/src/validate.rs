//! Recursive property validation
//!
//! Walks a [`PropertySchema`] against a [`PropertyMap`]. Only keys declared in
//! the schema are looked at; undeclared properties pass through untouched.

use crate::error::PropertyError;
use crate::schema::{ChildRule, PropertyRule, PropertySchema};
use tdly_typed::{PropertyMap, PropertyValue};

/// Validate `values` against every rule in `schema`
///
/// # Errors
/// - [`PropertyError::Missing`] when a required key is absent
/// - [`PropertyError::WrongType`] when a present value has the wrong shape,
///   with the full path to the offending leaf
pub fn validate_properties(schema: &PropertySchema, values: &PropertyMap) -> Result<(), PropertyError> {
    for (key, rule) in schema.iter() {
        validate_property(rule, values, key)?;
    }
    Ok(())
}

fn validate_property(rule: &PropertyRule, values: &PropertyMap, key: &str) -> Result<(), PropertyError> {
    match values.get(key) {
        None | Some(PropertyValue::Absent) if rule.is_required() => Err(PropertyError::missing(key)),
        None | Some(PropertyValue::Absent) => Ok(()),
        Some(value) => validate_value(rule, value).map_err(|e| e.prepended(key)),
    }
}

/// Validate a single value against a rule
///
/// Errors raised here carry a path relative to `value`.
pub fn validate_value(rule: &PropertyRule, value: &PropertyValue) -> Result<(), PropertyError> {
    match rule {
        PropertyRule::Primitive { kind, .. } => {
            if kind.matches(value) {
                Ok(())
            } else {
                Err(PropertyError::wrong_type(kind.as_str(), value.kind()))
            }
        }
        PropertyRule::Array { children, .. } => {
            let elements = value
                .as_array()
                .ok_or_else(|| PropertyError::wrong_type("array", value.kind()))?;
            if let ChildRule::Typed(child) = children {
                for (i, element) in elements.iter().enumerate() {
                    validate_value(child, element).map_err(|e| e.prepended(&format!("[{i}]")))?;
                }
            }
            Ok(())
        }
        PropertyRule::Object { children, .. } => {
            let entries = value
                .as_object()
                .ok_or_else(|| PropertyError::wrong_type("object", value.kind()))?;
            if let ChildRule::Typed(schema) = children {
                validate_properties(schema, entries)?;
            }
            Ok(())
        }
    }
}
