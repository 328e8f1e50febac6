//! Validated property lookup
//!
//! [`ItemPropertyMap`] binds an item's raw properties to the schema its
//! inflater declared. Construction validates; once a map exists, lookups of
//! declared keys can trust the declared shape.

use crate::error::PropertyError;
use crate::schema::{PrimitiveKind, PropertyRule, PropertySchema};
use crate::validate::validate_properties;
use tdly_typed::{PropertyMap, PropertyValue};

/// Raw property values paired with an optional schema
#[derive(Debug, Clone, Copy)]
pub struct ItemPropertyMap<'a> {
    values: &'a PropertyMap,
    schema: Option<&'a PropertySchema>,
}

impl<'a> ItemPropertyMap<'a> {
    /// Bind and validate
    ///
    /// # Errors
    /// Returns the first [`PropertyError`] found by [`validate_properties`].
    pub fn new(values: &'a PropertyMap, schema: Option<&'a PropertySchema>) -> Result<Self, PropertyError> {
        let map = Self { values, schema };
        map.validate()?;
        Ok(map)
    }

    /// Re-run schema validation
    pub fn validate(&self) -> Result<(), PropertyError> {
        match self.schema {
            Some(schema) => validate_properties(schema, self.values),
            None => Ok(()),
        }
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &'a PropertyMap {
        self.values
    }

    #[inline]
    #[must_use]
    pub fn schema(&self) -> Option<&'a PropertySchema> {
        self.schema
    }

    /// Declared rule for `key`, if the schema has one
    pub fn rule(&self, key: &str) -> Result<Option<&'a PropertyRule>, PropertyError> {
        let key = first_segment(key)?;
        Ok(self.schema.and_then(|schema| schema.get(key)))
    }

    /// Look up `key`, asserting the schema does not declare it as anything but `kind`
    ///
    /// Absent values come back as `None`.
    ///
    /// # Errors
    /// - [`PropertyError::DeclaredKindMismatch`] if the schema declares another shape
    /// - [`PropertyError::UnsupportedPath`] for dotted keys
    pub fn get(&self, kind: PrimitiveKind, key: &str) -> Result<Option<&'a PropertyValue>, PropertyError> {
        if let Some(rule) = self.rule(key)? {
            if !rule.is_primitive_of(kind) {
                return Err(PropertyError::DeclaredKindMismatch {
                    key: key.to_string(),
                    requested: kind,
                    declared: rule.expected_kind().to_string(),
                });
            }
        }
        self.force_get(key)
    }

    /// Look up `key` without consulting the schema
    pub fn force_get(&self, key: &str) -> Result<Option<&'a PropertyValue>, PropertyError> {
        let key = first_segment(key)?;
        Ok(self.values.get(key).filter(|v| !v.is_absent()))
    }

    /// String property
    pub fn get_str(&self, key: &str) -> Result<Option<&'a str>, PropertyError> {
        self.get(PrimitiveKind::String, key)?
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| PropertyError::wrong_type("string", v.kind()).prepended(key))
            })
            .transpose()
    }

    /// Boolean property
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, PropertyError> {
        self.get(PrimitiveKind::Boolean, key)?
            .map(|v| {
                v.as_bool()
                    .ok_or_else(|| PropertyError::wrong_type("boolean", v.kind()).prepended(key))
            })
            .transpose()
    }

    /// Numeric property, widened to `f64`
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, PropertyError> {
        self.get(PrimitiveKind::Number, key)?
            .map(|v| {
                v.as_f64()
                    .ok_or_else(|| PropertyError::wrong_type("number", v.kind()).prepended(key))
            })
            .transpose()
    }

    /// Sequence of strings; absent yields an empty list
    pub fn force_get_str_list(&self, key: &str) -> Result<Vec<String>, PropertyError> {
        let Some(value) = self.force_get(key)? else {
            return Ok(Vec::new());
        };
        let elements = value
            .as_array()
            .ok_or_else(|| PropertyError::wrong_type("array", value.kind()).prepended(key))?;
        elements
            .iter()
            .enumerate()
            .map(|(i, element)| {
                element.as_str().map(str::to_string).ok_or_else(|| {
                    PropertyError::wrong_type("string", element.kind())
                        .prepended(&format!("[{i}]"))
                        .prepended(key)
                })
            })
            .collect()
    }
}

fn first_segment(key: &str) -> Result<&str, PropertyError> {
    match key.split_once('.') {
        None => Ok(key),
        Some(_) => Err(PropertyError::UnsupportedPath {
            key: key.to_string(),
        }),
    }
}
