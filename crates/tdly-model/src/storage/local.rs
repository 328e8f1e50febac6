//! Local filesystem storage
//!
//! Documents live at `base_path/relative_path`. Parent folders are created on
//! write; reads refuse files larger than the configured limit.

use super::{DocumentStorage, Folder, ListParams, StorageParams};
use crate::config::DEFAULT_MAX_DOCUMENT_SIZE;
use crate::document::Document;
use crate::error::StorageError;
use std::path::Path;

/// Filesystem-backed document storage
#[derive(Debug, Clone, Copy)]
pub struct LocalDocumentStorage {
    max_document_size: u64,
}

impl LocalDocumentStorage {
    /// Create storage with the default size limit
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
        }
    }

    /// With maximum document size in bytes
    #[inline]
    #[must_use]
    pub fn with_max_document_size(mut self, max: u64) -> Self {
        self.max_document_size = max;
        self
    }

    #[inline]
    #[must_use]
    pub fn max_document_size(&self) -> u64 {
        self.max_document_size
    }
}

impl Default for LocalDocumentStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentStorage for LocalDocumentStorage {
    async fn read(&self, params: &StorageParams<'_>) -> Result<Document, StorageError> {
        let path = params.base_path.join(params.relative_path);

        let size = tokio::fs::metadata(&path)
            .await
            .map_err(|e| StorageError::io_error(&path, e))?
            .len();
        if size > self.max_document_size {
            tracing::warn!(
                "Refusing to read {}: {} bytes exceeds limit of {}",
                path.display(),
                size,
                self.max_document_size
            );
            return Err(StorageError::TooLarge {
                path,
                size,
                max: self.max_document_size,
            });
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StorageError::io_error(&path, e))?;
        tracing::trace!("Read {} bytes from {}", content.len(), path.display());

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

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io_error(parent, e))?;
        }
        tokio::fs::write(&path, content.as_bytes())
            .await
            .map_err(|e| StorageError::io_error(&path, e))?;
        tracing::trace!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    async fn list(&self, params: &ListParams<'_>) -> Result<Folder, StorageError> {
        let dir = match params.folder {
            Some(folder) => params.base_path.join(folder),
            None => params.base_path.to_path_buf(),
        };

        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| StorageError::io_error(&dir, e))?;
        let mut folder = Folder::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io_error(&dir, e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StorageError::io_error(entry.path(), e))?;
            if file_type.is_dir() {
                folder.folders.insert(name);
            } else if has_extension(&name, params.serializer.extension()) {
                folder.documents.insert(name);
            }
        }
        tracing::trace!(
            "Listed {}: {} folders, {} documents",
            dir.display(),
            folder.folders.len(),
            folder.documents.len()
        );
        Ok(folder)
    }
}

pub(super) fn has_extension(name: &str, extension: &str) -> bool {
    Path::new(name).extension().and_then(|e| e.to_str()) == Some(extension)
}
