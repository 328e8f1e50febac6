//! tdly document model
//!
//! Stores documents (typed, ordered collections of items such as a todo list)
//! in a generic form and inflates them into typed values after validating
//! them against declarative property schemas. A content-hash cache keeps
//! reads and no-op writes away from storage.
//!
//! # Architecture
//!
//! ```text
//! bytes → Serializer → generic Document → Model (cache) → Inflater registry → typed document
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tdly_model::{LocalDocumentStorage, Model, ModelConfig, LIST_TYPE};
//!
//! # async fn example() -> tdly_model::ModelResult<()> {
//! let config = ModelConfig::new().with_base_path("/home/me/todo");
//! let model = Model::tdly(config, Arc::new(LocalDocumentStorage::new()))?;
//!
//! let list = model.read(LIST_TYPE, "todo.yml").await?;
//! let generic = list.into_list().map(|l| l.to_document());
//! if let Some(generic) = generic {
//!     model.write(&generic).await?;
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cache;
pub mod config;
pub mod document;
pub mod documents;
pub mod error;
pub mod inflater;
pub mod model;
pub mod serializer;
pub mod storage;

pub use cache::{CacheEntry, CacheStats, DocumentCache};
pub use config::{ModelConfig, DEFAULT_MAX_DOCUMENT_SIZE};
pub use document::{validate_document, validate_document_item, Document, DocumentItem, KeyLayout};
pub use documents::{
    tdly_inflaters, Item, List, Tag, Tags, TdlyDocument, ITEM_TYPE, LIST_TYPE, TAGS_TYPE, TAG_TYPE,
};
pub use error::{
    DocumentError, InflateError, ModelError, ModelResult, SerializeError, StorageError,
};
pub use inflater::{
    DocumentInflater, DocumentInflaterRegistry, DynDocumentInflater, DynItemInflater,
    InflateContext, ItemInflater, ItemInflaterRegistry,
};
pub use model::{Model, WriteOutcome};
pub use serializer::{DocumentSerializer, JsonDocumentSerializer, YamlDocumentSerializer};
pub use storage::{
    DocumentStorage, Folder, InMemoryDocumentStorage, ListParams, LocalDocumentStorage,
    StorageParams,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
