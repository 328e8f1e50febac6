//! Document cache keyed by document type and relative path
//!
//! Holds the last confirmed generic form of every document a model has read
//! or written, together with its content hash. Entries are replaced, never
//! evicted or expired.
//!
//! The cache also hands out one async lock per key so callers can make a
//! read-or-load, or a write plus read-back, atomic for that key.

use crate::document::Document;
use dashmap::DashMap;
use std::sync::Arc;
use tdly_typed::ContentHash;
use tokio::sync::Mutex;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of document types with at least one entry
    pub document_types: usize,
    /// Number of cached documents
    pub entry_count: usize,
}

/// Last confirmed content of one document
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub hash: ContentHash,
    pub document: Arc<Document>,
}

/// Two-level document cache: type, then relative path
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: DashMap<String, DashMap<String, CacheEntry>>,
    locks: DashMap<(String, String), Arc<Mutex<()>>>,
}

impl DocumentCache {
    /// Create empty cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entry for a document
    #[must_use]
    pub fn entry(&self, doc_type: &str, relative_path: &str) -> Option<CacheEntry> {
        let by_path = self.entries.get(doc_type)?;
        let entry = by_path.get(relative_path)?.value().clone();
        Some(entry)
    }

    /// Content hash of the cached document
    #[must_use]
    pub fn hash(&self, doc_type: &str, relative_path: &str) -> Option<ContentHash> {
        self.entry(doc_type, relative_path).map(|entry| entry.hash)
    }

    /// Insert or replace the entry for `document`, keyed by its own type and path
    pub fn insert(&self, hash: ContentHash, document: Document) -> Arc<Document> {
        let document = Arc::new(document);
        self.entries
            .entry(document.doc_type.clone())
            .or_default()
            .insert(
                document.relative_path.clone(),
                CacheEntry {
                    hash,
                    document: Arc::clone(&document),
                },
            );
        document
    }

    /// Check if a document is cached
    #[must_use]
    pub fn contains(&self, doc_type: &str, relative_path: &str) -> bool {
        self.entries
            .get(doc_type)
            .is_some_and(|by_path| by_path.contains_key(relative_path))
    }

    /// Lock guarding loads and writes of one document
    #[must_use]
    pub fn key_lock(&self, doc_type: &str, relative_path: &str) -> Arc<Mutex<()>> {
        let key = (doc_type.to_string(), relative_path.to_string());
        Arc::clone(self.locks.entry(key).or_default().value())
    }

    /// Number of cached documents across all types
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().map(|by_path| by_path.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            document_types: self.entries.iter().filter(|by_path| !by_path.is_empty()).count(),
            entry_count: self.len(),
        }
    }
}
