//! Document storage
//!
//! The [`DocumentStorage`] port reads, writes and lists documents under a base
//! path. Storage delegates text conversion to the [`DocumentSerializer`]
//! passed in with every call, so any storage works with any format.
//!
//! - [`LocalDocumentStorage`]: files on the local filesystem
//! - [`InMemoryDocumentStorage`]: serialized text held in a concurrent map

use crate::document::Document;
use crate::error::StorageError;
use crate::serializer::DocumentSerializer;
use std::collections::BTreeSet;
use std::path::Path;

mod local;
mod memory;

pub use local::LocalDocumentStorage;
pub use memory::InMemoryDocumentStorage;

/// Everything a storage needs to locate and decode one document
#[derive(Clone, Copy)]
pub struct StorageParams<'a> {
    pub doc_type: &'a str,
    pub item_types: &'a [&'a str],
    pub base_path: &'a Path,
    pub relative_path: &'a str,
    pub serializer: &'a dyn DocumentSerializer,
}

impl std::fmt::Debug for StorageParams<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageParams")
            .field("doc_type", &self.doc_type)
            .field("item_types", &self.item_types)
            .field("base_path", &self.base_path)
            .field("relative_path", &self.relative_path)
            .field("serializer", &self.serializer.name())
            .finish()
    }
}

/// Parameters for listing a folder
#[derive(Clone, Copy)]
pub struct ListParams<'a> {
    pub base_path: &'a Path,
    /// Folder below `base_path` to list; `None` lists `base_path` itself
    pub folder: Option<&'a str>,
    pub serializer: &'a dyn DocumentSerializer,
}

impl std::fmt::Debug for ListParams<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListParams")
            .field("base_path", &self.base_path)
            .field("folder", &self.folder)
            .field("serializer", &self.serializer.name())
            .finish()
    }
}

/// Names of the documents and sub-folders directly inside a folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Folder {
    pub folders: BTreeSet<String>,
    pub documents: BTreeSet<String>,
}

impl Folder {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.documents.is_empty()
    }
}

/// Reads and writes documents in permanent storage
#[async_trait::async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Read, deserialize and structurally validate one document
    async fn read(&self, params: &StorageParams<'_>) -> Result<Document, StorageError>;

    /// Serialize and store one document
    async fn write(&self, params: &StorageParams<'_>, document: &Document) -> Result<(), StorageError>;

    /// List the documents and folders directly under a folder
    async fn list(&self, params: &ListParams<'_>) -> Result<Folder, StorageError>;
}
