//! Document serializers
//!
//! A [`DocumentSerializer`] turns a [`Document`] into text and back. It is also
//! the authority on content hashes: two documents are "the same" exactly when
//! they serialize to the same bytes.
//!
//! - [`YamlDocumentSerializer`]: the default on-disk format
//! - [`JsonDocumentSerializer`]: pretty-printed JSON

use crate::document::{validate_document, Document, RELATIVE_PATH_KEY};
use crate::error::SerializeError;
use tdly_typed::{ContentHash, PropertyValue};

mod json;
mod yaml;

pub use json::JsonDocumentSerializer;
pub use yaml::YamlDocumentSerializer;

/// Converts documents to and from text
///
/// Implementations must uphold the round-trip contract: content that
/// deserializes cleanly and is not edited serializes back to the same bytes.
/// The relative path is never part of the serialized form.
pub trait DocumentSerializer: Send + Sync + 'static {
    /// Short format name, for logs
    fn name(&self) -> &str;

    /// File extension (without dot) for documents in this format
    fn extension(&self) -> &str;

    /// Render a document as text
    fn serialize(&self, document: &Document) -> Result<String, SerializeError>;

    /// Parse text into a raw structure, nulls and all
    fn parse(&self, content: &str) -> Result<serde_json::Value, SerializeError>;

    /// Parse text into a normalized mapping carrying `relativePath`
    ///
    /// # Errors
    /// [`SerializeError::NotAMapping`] if the top level is not a mapping.
    fn deserialize_to_object(&self, content: &str, relative_path: &str) -> Result<PropertyValue, SerializeError> {
        match PropertyValue::from_raw(self.parse(content)?) {
            PropertyValue::Object(mut map) => {
                map.insert(RELATIVE_PATH_KEY.to_string(), relative_path.into());
                Ok(PropertyValue::Object(map))
            }
            other => Err(SerializeError::NotAMapping {
                actual: other.kind(),
            }),
        }
    }

    /// Parse and structurally validate a document
    fn deserialize(
        &self,
        doc_type: &str,
        item_types: &[&str],
        content: &str,
        relative_path: &str,
    ) -> Result<Document, SerializeError> {
        let raw = self.deserialize_to_object(content, relative_path)?;
        Ok(validate_document(doc_type, item_types, raw)?)
    }

    /// Hash of the text `document` serializes to
    fn compute_hash(&self, document: &Document) -> Result<ContentHash, SerializeError> {
        Ok(self.compute_content_hash(&self.serialize(document)?))
    }

    /// Hash of already-serialized content
    fn compute_content_hash(&self, content: &str) -> ContentHash {
        ContentHash::compute(content.as_bytes())
    }

    /// Whether `document` differs from the content behind `previous`
    ///
    /// With no previous hash there is nothing to compare against, so the
    /// document counts as changed.
    fn has_changed(&self, document: &Document, previous: Option<&ContentHash>) -> Result<bool, SerializeError> {
        match previous {
            None => Ok(true),
            Some(previous) => Ok(self.compute_hash(document)? != *previous),
        }
    }
}
