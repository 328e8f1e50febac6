//! Generic documents and items
//!
//! A [`Document`] is a typed, named bag of properties with an ordered list of
//! [`DocumentItem`]s. This is the shape every stored document has before an
//! inflater turns it into something domain specific.
//!
//! [`validate_document`] is the structural gate between raw deserialized
//! content and the rest of the pipeline.
//!
//! Stored keys with no standard field, and the order keys were stored in, are
//! kept in a [`KeyLayout`] so that an unedited document renders back exactly
//! as it was read.

use crate::error::DocumentError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tdly_typed::{check_one_of, serialize_present_entries, PropertyMap, PropertyValue, TypeTagError};

/// Key holding an entity's name
pub const NAME_KEY: &str = "name";
/// Key holding an entity's property mapping
pub const PROPERTIES_KEY: &str = "properties";
/// Key holding a document's items
pub const ITEMS_KEY: &str = "items";
/// Key the serializer inserts to carry the storage path through validation
pub const RELATIVE_PATH_KEY: &str = "relativePath";

/// Stored shape of a document or item beyond its standard fields
///
/// Equality looks at `extra` only: key order affects rendering, not content.
#[derive(Debug, Clone, Default)]
pub struct KeyLayout {
    /// Top-level keys in stored order; empty for entities built in code
    pub order: Vec<String>,
    /// Keys without a standard field, carried through unchanged
    pub extra: PropertyMap,
}

impl PartialEq for KeyLayout {
    fn eq(&self, other: &Self) -> bool {
        self.extra == other.extra
    }
}

impl KeyLayout {
    fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }

    /// Properties are rendered when stored, when built in code, or once they hold something
    fn properties_field<'a>(&self, properties: &'a PropertyMap) -> Option<Field<'a>> {
        let keep = self.order.is_empty()
            || self.contains(PROPERTIES_KEY)
            || properties.values().any(|v| !v.is_absent());
        keep.then_some(Field::Properties(properties))
    }

    /// Write `standard` fields and extra keys as one mapping
    ///
    /// Stored keys come first in stored order, then standard fields that were
    /// not stored, then new extra keys. Absent values are left out.
    fn serialize_with<'a, S>(
        &'a self,
        serializer: S,
        standard: &[(&'a str, Option<Field<'a>>)],
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let is_standard = |key: &str| standard.iter().any(|(k, _)| *k == key);
        let mut entries: Vec<(&str, Field<'_>)> = Vec::with_capacity(standard.len() + self.extra.len());

        for key in &self.order {
            match standard.iter().find(|(k, _)| *k == key.as_str()) {
                Some((k, Some(field))) => entries.push((*k, *field)),
                Some((_, None)) => {}
                None => {
                    if let Some(value) = self.extra.get(key).filter(|v| !v.is_absent()) {
                        entries.push((key.as_str(), Field::Value(value)));
                    }
                }
            }
        }
        for (key, field) in standard {
            if let Some(field) = field.filter(|_| !self.contains(key)) {
                entries.push((*key, field));
            }
        }
        for (key, value) in &self.extra {
            if !self.contains(key) && !is_standard(key.as_str()) && !value.is_absent() {
                entries.push((key.as_str(), Field::Value(value)));
            }
        }

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, field) in &entries {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}

/// Rendered value of one top-level key
#[derive(Clone, Copy)]
enum Field<'a> {
    Str(&'a str),
    Properties(&'a PropertyMap),
    Items(&'a [DocumentItem]),
    Value(&'a PropertyValue),
}

impl Serialize for Field<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Properties(map) => serialize_present_entries(map, serializer),
            Self::Items(items) => items.serialize(serializer),
            Self::Value(value) => value.serialize(serializer),
        }
    }
}

/// A single entry in a document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentItem {
    pub item_type: String,
    pub name: String,
    pub properties: PropertyMap,
    pub layout: KeyLayout,
}

impl Serialize for DocumentItem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.layout.serialize_with(
            serializer,
            &[
                (tdly_typed::TYPE_KEY, Some(Field::Str(&self.item_type))),
                (NAME_KEY, Some(Field::Str(&self.name))),
                (PROPERTIES_KEY, self.layout.properties_field(&self.properties)),
            ],
        )
    }
}

impl DocumentItem {
    /// Create an item with no properties
    #[must_use]
    pub fn new(item_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            name: name.into(),
            properties: PropertyMap::new(),
            layout: KeyLayout::default(),
        }
    }

    /// Set a property (builder style)
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set a key outside `properties` (builder style)
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.layout.extra.insert(key.into(), value.into());
        self
    }
}

/// A stored document in its generic form
///
/// `relative_path` identifies the document within its type and is never
/// serialized, so the content hash depends only on content.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub doc_type: String,
    pub name: String,
    pub properties: PropertyMap,
    pub relative_path: String,
    pub items: Vec<DocumentItem>,
    pub layout: KeyLayout,
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.layout.serialize_with(
            serializer,
            &[
                (tdly_typed::TYPE_KEY, Some(Field::Str(&self.doc_type))),
                (NAME_KEY, Some(Field::Str(&self.name))),
                (PROPERTIES_KEY, self.layout.properties_field(&self.properties)),
                (ITEMS_KEY, Some(Field::Items(&self.items))),
            ],
        )
    }
}

impl Document {
    /// Create an empty document
    #[must_use]
    pub fn new(
        doc_type: impl Into<String>,
        name: impl Into<String>,
        relative_path: impl Into<String>,
    ) -> Self {
        Self {
            doc_type: doc_type.into(),
            name: name.into(),
            properties: PropertyMap::new(),
            relative_path: relative_path.into(),
            items: Vec::new(),
            layout: KeyLayout::default(),
        }
    }

    /// Set a property (builder style)
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set a key outside `properties` (builder style)
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.layout.extra.insert(key.into(), value.into());
        self
    }

    /// Append an item (builder style)
    #[must_use]
    pub fn with_item(mut self, item: DocumentItem) -> Self {
        self.items.push(item);
        self
    }

    /// Check that every item carries a well-formed tag from `item_types`
    ///
    /// # Errors
    /// [`DocumentError::Item`] wrapping the tag failure of the first bad item.
    pub fn check_item_types<S: AsRef<str>>(&self, item_types: &[S]) -> Result<(), DocumentError> {
        for (index, item) in self.items.iter().enumerate() {
            check_item_tag(item_types, &item.item_type)
                .map_err(|e| DocumentError::item(index, Some(item.name.clone()), e.into()))?;
        }
        Ok(())
    }
}

fn check_item_tag<S: AsRef<str>>(item_types: &[S], tag: &str) -> Result<(), TypeTagError> {
    tdly_typed::check_tag(tag)?;
    if item_types.iter().any(|t| t.as_ref() == tag) {
        Ok(())
    } else {
        Err(TypeTagError::WrongTypeTag {
            expected: item_types.iter().map(|t| t.as_ref().to_string()).collect(),
            actual: tag.to_string(),
        })
    }
}

/// Validate a raw item against the permitted tags and build a [`DocumentItem`]
///
/// # Errors
/// - [`DocumentError::TypeTag`] for a missing, malformed or unexpected tag
/// - [`DocumentError::MissingName`] if `name` is not a string (empty is fine)
/// - [`DocumentError::InvalidProperties`] if `properties` is not a mapping
pub fn validate_document_item<S: AsRef<str>>(
    item_types: &[S],
    raw: impl Into<PropertyValue>,
) -> Result<DocumentItem, DocumentError> {
    let parts = TypedParts::take(item_types, raw.into())?;
    Ok(DocumentItem {
        item_type: parts.tag,
        name: parts.name,
        properties: parts.properties,
        layout: parts.layout,
    })
}

/// Validate a raw document and build a [`Document`]
///
/// Nulls are normalized to absent before anything is checked. Item failures
/// are wrapped in [`DocumentError::Item`] so the offending item is named.
///
/// # Errors
/// Everything [`validate_document_item`] reports for the document itself, plus
/// - [`DocumentError::MissingRelativePath`]
/// - [`DocumentError::MissingItems`]
/// - [`DocumentError::Item`]
pub fn validate_document<S: AsRef<str>>(
    doc_type: &str,
    item_types: &[S],
    raw: impl Into<PropertyValue>,
) -> Result<Document, DocumentError> {
    let mut parts = TypedParts::take(&[doc_type], raw.into())?;

    let relative_path = match parts.layout.extra.shift_remove(RELATIVE_PATH_KEY) {
        Some(PropertyValue::String(path)) if !path.is_empty() => path,
        _ => return Err(DocumentError::MissingRelativePath),
    };
    parts.layout.order.retain(|key| key != RELATIVE_PATH_KEY);
    let raw_items = match parts.layout.extra.shift_remove(ITEMS_KEY) {
        Some(PropertyValue::Array(items)) => items,
        _ => return Err(DocumentError::MissingItems),
    };

    let items = raw_items
        .into_iter()
        .enumerate()
        .map(|(index, raw_item)| {
            let name = raw_item
                .get(NAME_KEY)
                .and_then(PropertyValue::as_str)
                .map(str::to_string);
            validate_document_item(item_types, raw_item)
                .map_err(|source| DocumentError::item(index, name, source))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Document {
        doc_type: parts.tag,
        name: parts.name,
        properties: parts.properties,
        relative_path,
        items,
        layout: parts.layout,
    })
}

/// Fields shared by documents and items, split off a raw mapping
///
/// Whatever is left of the mapping ends up in `layout.extra`.
struct TypedParts {
    tag: String,
    name: String,
    properties: PropertyMap,
    layout: KeyLayout,
}

impl TypedParts {
    fn take<S: AsRef<str>>(expected: &[S], raw: PropertyValue) -> Result<Self, DocumentError> {
        let tag = check_one_of(expected, &raw)?.to_string();
        let PropertyValue::Object(mut rest) = raw else {
            return Err(TypeTagError::MissingTypeTag.into());
        };
        let order = rest
            .iter()
            .filter(|(_, value)| !value.is_absent())
            .map(|(key, _)| key.clone())
            .collect();

        let name = match rest.shift_remove(NAME_KEY) {
            Some(PropertyValue::String(name)) => name,
            _ => return Err(DocumentError::MissingName),
        };
        let properties = match rest.shift_remove(PROPERTIES_KEY) {
            None | Some(PropertyValue::Absent) => PropertyMap::new(),
            Some(PropertyValue::Object(properties)) => properties,
            Some(other) => {
                return Err(DocumentError::InvalidProperties {
                    actual: other.kind(),
                })
            }
        };
        rest.shift_remove(tdly_typed::TYPE_KEY);

        Ok(Self {
            tag,
            name,
            properties,
            layout: KeyLayout { order, extra: rest },
        })
    }
}
