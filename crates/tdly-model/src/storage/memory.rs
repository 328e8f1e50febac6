//! In-memory storage
//!
//! Holds serialized text rather than documents, so reads and writes pass
//! through the serializer exactly as they would on disk.

use super::local::has_extension;
use super::{DocumentStorage, Folder, ListParams, StorageParams};
use crate::document::Document;
use crate::error::StorageError;
use dashmap::DashMap;
use std::path::{Path, PathBuf};

/// Concurrent map of full path to serialized document text
#[derive(Debug, Default)]
pub struct InMemoryDocumentStorage {
    documents: DashMap<PathBuf, String>,
}

impl InMemoryDocumentStorage {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text at `path`, bypassing the serializer
    pub fn insert_raw(&self, path: impl Into<PathBuf>, content: impl Into<String>) -> Option<String> {
        self.documents.insert(path.into(), content.into())
    }

    /// Raw text stored at `path`
    #[must_use]
    pub fn get_raw(&self, path: impl AsRef<Path>) -> Option<String> {
        self.documents.get(path.as_ref()).map(|entry| entry.value().clone())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait::async_trait]
impl DocumentStorage for InMemoryDocumentStorage {
    async fn read(&self, params: &StorageParams<'_>) -> Result<Document, StorageError> {
        let path = params.base_path.join(params.relative_path);
        let content = self
            .get_raw(&path)
            .ok_or_else(|| StorageError::NotFound(path.display().to_string()))?;
        tracing::trace!("Read {} bytes from memory at {}", content.len(), path.display());

        Ok(params.serializer.deserialize(
            params.doc_type,
            params.item_types,
            &content,
            params.relative_path,
        )?)
    }

    async fn write(&self, params: &StorageParams<'_>, document: &Document) -> Result<(), StorageError> {
        let path = params.base_path.join(params.relative_path);
        let content = params.serializer.serialize(document)?;
        tracing::trace!("Wrote {} bytes to memory at {}", content.len(), path.display());
        self.documents.insert(path, content);
        Ok(())
    }

    async fn list(&self, params: &ListParams<'_>) -> Result<Folder, StorageError> {
        let dir = match params.folder {
            Some(folder) => params.base_path.join(folder),
            None => params.base_path.to_path_buf(),
        };

        let mut folder = Folder::new();
        for entry in self.documents.iter() {
            let Ok(rest) = entry.key().strip_prefix(&dir) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            let name = first.as_os_str().to_string_lossy().into_owned();
            if components.next().is_some() {
                folder.folders.insert(name);
            } else if has_extension(&name, params.serializer.extension()) {
                folder.documents.insert(name);
            }
        }
        Ok(folder)
    }
}
