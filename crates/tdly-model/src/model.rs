//! Model orchestrator
//!
//! Composes a [`DocumentStorage`], a [`DocumentSerializer`], the document
//! inflater registry and a [`DocumentCache`] into read, write and list
//! operations.
//!
//! # Architecture
//!
//! ```text
//! read:  cache ──miss──→ Storage.read → hash → cache ─→ inflate → D
//! write: hash ──same as cache──→ Unchanged
//!          └──differs──→ Storage.write → Storage.read → hash → cache
//! ```
//!
//! Cache entries only ever change after storage has confirmed a round trip,
//! so a failed write leaves the cache matching the last known-good content.
//! Every load and write holds the per-key lock from the cache, which
//! collapses concurrent loads of one document into a single storage read.

use crate::cache::{CacheStats, DocumentCache};
use crate::config::ModelConfig;
use crate::document::Document;
use crate::error::{ModelError, ModelResult};
use crate::inflater::{DocumentInflaterRegistry, DynDocumentInflater};
use crate::serializer::DocumentSerializer;
use crate::storage::{DocumentStorage, Folder, ListParams, StorageParams};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use tdly_typed::ContentHash;

/// Result of [`Model::write`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Content matched the cached hash; storage was not touched
    Unchanged,
    /// Content was stored and read back; `hash` is of the read-back copy
    Written { hash: ContentHash },
}

impl WriteOutcome {
    #[inline]
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Document model producing typed documents of type `D`
pub struct Model<D> {
    config: ModelConfig,
    storage: Arc<dyn DocumentStorage>,
    serializer: Arc<dyn DocumentSerializer>,
    inflaters: DocumentInflaterRegistry<D>,
    cache: DocumentCache,
}

impl<D> Model<D> {
    /// Create a model over the given ports
    #[must_use]
    pub fn new(
        config: ModelConfig,
        storage: Arc<dyn DocumentStorage>,
        serializer: Arc<dyn DocumentSerializer>,
        inflaters: DocumentInflaterRegistry<D>,
    ) -> Self {
        tracing::debug!(
            "Creating model at {} ({} serializer, {} document types)",
            config.base_path.display(),
            serializer.name(),
            inflaters.len()
        );
        Self {
            config,
            storage,
            serializer,
            inflaters,
            cache: DocumentCache::new(),
        }
    }

    /// Get the generic document, from cache when possible
    ///
    /// # Errors
    /// - [`ModelError::UnknownDocumentType`] before any I/O if `doc_type` has no inflater
    /// - storage and serializer errors, unmodified
    pub async fn read_generic(&self, doc_type: &str, relative_path: &str) -> ModelResult<Arc<Document>> {
        let inflater = self.inflater(doc_type)?;

        let lock = self.cache.key_lock(doc_type, relative_path);
        let _guard = lock.lock().await;

        if let Some(entry) = self.cache.entry(doc_type, relative_path) {
            tracing::debug!("Cache hit: {}/{} ({})", doc_type, relative_path, entry.hash.short());
            return Ok(entry.document);
        }
        tracing::debug!("Cache miss: {}/{}", doc_type, relative_path);

        let item_types = inflater.item_types();
        let params = self.storage_params(doc_type, &item_types, relative_path);
        let document = self.storage.read(&params).await?;
        let hash = self.serializer.compute_hash(&document)?;
        Ok(self.cache.insert(hash, document))
    }

    /// Get the document and inflate it
    ///
    /// Only the generic form is cached; inflation runs on every call.
    pub async fn read(&self, doc_type: &str, relative_path: &str) -> ModelResult<D> {
        let generic = self.read_generic(doc_type, relative_path).await?;
        Ok(self.inflater(doc_type)?.inflate_document(&generic)?)
    }

    /// Store the document unless its content matches the cached copy
    ///
    /// After storing, the document is read back and the read-back copy (with
    /// whatever normalization storage applied) replaces the cache entry.
    ///
    /// # Errors
    /// - [`ModelError::UnknownDocumentType`] if the document type has no inflater
    /// - [`ModelError::Document`] if an item's tag is not permitted for the document type
    /// - storage and serializer errors, unmodified; the cache is left as it was
    pub async fn write(&self, document: &Document) -> ModelResult<WriteOutcome> {
        let doc_type = document.doc_type.as_str();
        let relative_path = document.relative_path.as_str();
        let inflater = self.inflater(doc_type)?;
        let item_types = inflater.item_types();
        document.check_item_types(&item_types)?;

        let lock = self.cache.key_lock(doc_type, relative_path);
        let _guard = lock.lock().await;

        let previous = self.cache.hash(doc_type, relative_path);
        if !self.serializer.has_changed(document, previous.as_ref())? {
            tracing::debug!("Skipping write of unchanged {}/{}", doc_type, relative_path);
            return Ok(WriteOutcome::Unchanged);
        }

        let params = self.storage_params(doc_type, &item_types, relative_path);
        self.storage.write(&params, document).await?;
        let stored = self.storage.read(&params).await?;
        let hash = self.serializer.compute_hash(&stored)?;
        self.cache.insert(hash, stored);

        tracing::info!("Wrote {}/{} ({})", doc_type, relative_path, hash.short());
        Ok(WriteOutcome::Written { hash })
    }

    /// List the base folder
    pub async fn list(&self) -> ModelResult<Folder> {
        self.list_folder(None).await
    }

    /// List a folder below the base path
    pub async fn list_in(&self, folder: &str) -> ModelResult<Folder> {
        self.list_folder(Some(folder)).await
    }

    async fn list_folder(&self, folder: Option<&str>) -> ModelResult<Folder> {
        let params = ListParams {
            base_path: &self.config.base_path,
            folder,
            serializer: self.serializer.as_ref(),
        };
        Ok(self.storage.list(&params).await?)
    }

    /// Content hash of the cached copy of a document
    #[must_use]
    pub fn cached_hash(&self, doc_type: &str, relative_path: &str) -> Option<ContentHash> {
        self.cache.hash(doc_type, relative_path)
    }

    /// Registered document types, in registration order
    #[must_use]
    pub fn document_types(&self) -> Vec<&str> {
        self.inflaters.doc_types().collect()
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn serializer(&self) -> &dyn DocumentSerializer {
        self.serializer.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn inflater(&self, doc_type: &str) -> ModelResult<&dyn DynDocumentInflater<D>> {
        self.inflaters
            .get(doc_type)
            .ok_or_else(|| ModelError::UnknownDocumentType(doc_type.to_string()))
    }

    fn storage_params<'a>(
        &'a self,
        doc_type: &'a str,
        item_types: &'a [&'a str],
        relative_path: &'a str,
    ) -> StorageParams<'a> {
        StorageParams {
            doc_type,
            item_types,
            base_path: &self.config.base_path,
            relative_path,
            serializer: self.serializer.as_ref(),
        }
    }
}

impl<D> Debug for Model<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("config", &self.config)
            .field("serializer", &self.serializer.name())
            .field("inflaters", &self.inflaters)
            .field("cache", &self.cache.stats())
            .finish()
    }
}
