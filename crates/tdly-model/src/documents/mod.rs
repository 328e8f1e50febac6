//! The tdly document types
//!
//! - [`List`] (`"List"`) of [`Item`]s (`"Item"`)
//! - [`Tags`] (`"Tags"`) of [`Tag`]s (`"Tag"`)
//!
//! [`TdlyDocument`] is the closed set of documents a tdly model produces.

use crate::config::ModelConfig;
use crate::error::{InflateError, ModelError, ModelResult};
use crate::inflater::DocumentInflaterRegistry;
use crate::model::Model;
use crate::storage::DocumentStorage;
use std::sync::Arc;

mod list;
mod tag;

pub use list::{Item, List, ListInflater, ListItemInflater, ITEM_TYPE, LIST_TYPE};
pub use tag::{Tag, TagInflater, Tags, TagsInflater, TAGS_TYPE, TAG_TYPE};

/// Any inflated tdly document
#[derive(Debug, Clone, PartialEq)]
pub enum TdlyDocument {
    List(List),
    Tags(Tags),
}

impl TdlyDocument {
    /// Tag of the underlying document type
    #[must_use]
    pub fn doc_type(&self) -> &'static str {
        match self {
            Self::List(_) => LIST_TYPE,
            Self::Tags(_) => TAGS_TYPE,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(list) => Some(list),
            Self::Tags(_) => None,
        }
    }

    #[must_use]
    pub fn into_list(self) -> Option<List> {
        match self {
            Self::List(list) => Some(list),
            Self::Tags(_) => None,
        }
    }

    #[must_use]
    pub fn as_tags(&self) -> Option<&Tags> {
        match self {
            Self::Tags(tags) => Some(tags),
            Self::List(_) => None,
        }
    }

    #[must_use]
    pub fn into_tags(self) -> Option<Tags> {
        match self {
            Self::Tags(tags) => Some(tags),
            Self::List(_) => None,
        }
    }
}

impl From<List> for TdlyDocument {
    fn from(list: List) -> Self {
        Self::List(list)
    }
}

impl From<Tags> for TdlyDocument {
    fn from(tags: Tags) -> Self {
        Self::Tags(tags)
    }
}

/// Registry of every tdly document inflater
///
/// # Errors
/// Only on a registry wiring mistake.
pub fn tdly_inflaters() -> Result<DocumentInflaterRegistry<TdlyDocument>, InflateError> {
    DocumentInflaterRegistry::new()
        .with(ListInflater::new()?)?
        .with(TagsInflater::new()?)
}

impl Model<TdlyDocument> {
    /// Model over the tdly document types, with the serializer named by the config
    ///
    /// # Errors
    /// [`ModelError::UnsupportedExtension`] if the configured extension names no known format.
    pub fn tdly(config: ModelConfig, storage: Arc<dyn DocumentStorage>) -> ModelResult<Self> {
        let serializer = config
            .serializer()
            .ok_or_else(|| ModelError::UnsupportedExtension(config.default_extension.clone()))?;
        Ok(Self::new(config, storage, serializer, tdly_inflaters()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_both_document_types() {
        let registry = tdly_inflaters().unwrap();
        assert_eq!(registry.doc_types().collect::<Vec<_>>(), vec![LIST_TYPE, TAGS_TYPE]);
        assert_eq!(registry.get(LIST_TYPE).unwrap().item_types(), vec![ITEM_TYPE]);
        assert_eq!(registry.get(TAGS_TYPE).unwrap().item_types(), vec![TAG_TYPE]);
    }

    #[test]
    fn accessors() {
        let tags = TdlyDocument::from(Tags {
            name: "t".into(),
            relative_path: "t.yml".into(),
            tags: Vec::new(),
        });
        assert_eq!(tags.doc_type(), TAGS_TYPE);
        assert!(tags.as_list().is_none());
        assert!(tags.into_tags().is_some());
    }
}
