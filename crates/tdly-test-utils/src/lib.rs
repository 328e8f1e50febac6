//! Testing utilities for the tdly workspace
//!
//! Shared fixtures, storage doubles and tracing setup.

#![allow(missing_docs)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use tdly_model::{
    Document, DocumentStorage, Folder, InMemoryDocumentStorage, ListParams, StorageError,
    StorageParams,
};

/// Two-item example list; item names are `weird` and `idk idk`
pub const EXAMPLE_LIST: &str = include_str!("../fixtures/examplelist.yml");

/// Example tag definitions matching the tags used in [`EXAMPLE_LIST`]
pub const EXAMPLE_TAGS: &str = include_str!("../fixtures/tags.yml");

/// Base path used by the in-memory fixtures
pub const BASE_PATH: &str = "/tdly";

pub const EXAMPLE_LIST_PATH: &str = "lists/example.yml";
pub const EXAMPLE_TAGS_PATH: &str = "tags.yml";

/// Install a test subscriber once per process; respects `RUST_LOG`
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// In-memory storage seeded with the example list and tags
pub fn seeded_storage() -> InMemoryDocumentStorage {
    let storage = InMemoryDocumentStorage::new();
    storage.insert_raw(format!("{BASE_PATH}/{EXAMPLE_LIST_PATH}"), EXAMPLE_LIST);
    storage.insert_raw(format!("{BASE_PATH}/{EXAMPLE_TAGS_PATH}"), EXAMPLE_TAGS);
    storage
}

/// Storage wrapper that counts calls and can be told to fail writes
pub struct CountingStorage {
    inner: Arc<dyn DocumentStorage>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    lists: AtomicUsize,
    fail_writes: AtomicBool,
}

impl CountingStorage {
    pub fn new(inner: Arc<dyn DocumentStorage>) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            lists: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Counting wrapper over [`seeded_storage`]
    pub fn seeded() -> Arc<Self> {
        Arc::new(Self::new(Arc::new(seeded_storage())))
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    /// Make every following write fail with an IO error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl DocumentStorage for CountingStorage {
    async fn read(&self, params: &StorageParams<'_>) -> Result<Document, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(params).await
    }

    async fn write(&self, params: &StorageParams<'_>, document: &Document) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::io_error(
                params.base_path.join(params.relative_path),
                std::io::Error::new(std::io::ErrorKind::Other, "write refused"),
            ));
        }
        self.inner.write(params, document).await
    }

    async fn list(&self, params: &ListParams<'_>) -> Result<Folder, StorageError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list(params).await
    }
}
