//! Error types for the document model
//!
//! Provides error handling for:
//! - Structural document validation (generic shape, type tags)
//! - Inflation (schema failures, registry wiring)
//! - Serializer and storage ports
//! - Model orchestration

use std::path::PathBuf;
use tdly_schema::PropertyError;
use tdly_typed::{TypeTagError, ValueKind};

/// Structural errors in a generic document or item
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    /// Missing, malformed or unexpected `type` tag
    #[error(transparent)]
    TypeTag(#[from] TypeTagError),

    /// `name` is absent or not a string
    #[error("missing name")]
    MissingName,

    /// `properties` is present but not a mapping
    #[error("properties must be a mapping, found {actual}")]
    InvalidProperties { actual: ValueKind },

    /// `relativePath` is absent, empty or not a string
    #[error("missing relative path")]
    MissingRelativePath,

    /// `items` is absent or not a sequence
    #[error("items must be a sequence")]
    MissingItems,

    /// One of the document's items is invalid
    #[error("item {index} ({}): {source}", name.as_deref().unwrap_or("<unnamed>"))]
    Item {
        index: usize,
        name: Option<String>,
        #[source]
        source: Box<DocumentError>,
    },
}

impl DocumentError {
    /// Wrap an item failure with its position and name
    pub fn item(index: usize, name: Option<String>, source: DocumentError) -> Self {
        Self::Item {
            index,
            name,
            source: Box::new(source),
        }
    }

    /// Innermost error, looking through item annotations
    #[must_use]
    pub fn root_cause(&self) -> &DocumentError {
        match self {
            Self::Item { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors raised while inflating a generic document into its typed form
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InflateError {
    /// Document or item properties failed schema validation or lookup
    #[error("invalid properties: {0}")]
    Properties(#[from] PropertyError),

    /// An item failed to inflate
    #[error("item {index} ({name}): {source}")]
    Item {
        index: usize,
        name: String,
        #[source]
        source: Box<InflateError>,
    },

    /// No item inflater registered for an item tag
    #[error("no item inflater registered for type: {0}")]
    UnregisteredItemType(String),

    /// Two item inflaters claim the same tag
    #[error("item type registered twice: {0}")]
    DuplicateItemType(String),

    /// Two document inflaters claim the same tag
    #[error("document type registered twice: {0}")]
    DuplicateDocumentType(String),
}

impl InflateError {
    /// Wrap an item failure with its position and name
    pub fn item(index: usize, name: impl Into<String>, source: InflateError) -> Self {
        Self::Item {
            index,
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error signals a wiring mistake rather than bad data
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::UnregisteredItemType(_)
            | Self::DuplicateItemType(_)
            | Self::DuplicateDocumentType(_) => true,
            Self::Item { source, .. } => source.is_configuration(),
            Self::Properties(_) => false,
        }
    }
}

/// Serializer port failures
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level content is not a mapping
    #[error("document content must be a mapping, found {actual}")]
    NotAMapping { actual: ValueKind },

    /// Content parsed but is not a well-formed document
    #[error("invalid document: {0}")]
    Document(#[from] DocumentError),
}

/// Storage port failures
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error while reading or writing
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored document exceeds the configured size limit
    #[error("document too large: {path} is {size} bytes (max: {max})")]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    /// Nothing stored under the requested path
    #[error("document not found: {0}")]
    NotFound(String),

    /// Stored content could not be (de)serialized
    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

impl StorageError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Combined model error
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error("inflate error: {0}")]
    Inflate(#[from] InflateError),

    #[error("invalid document: {0}")]
    Document(#[from] DocumentError),

    /// No document inflater registered for the requested type
    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),

    /// Configured extension names no known document format
    #[error("no serializer for extension: '{0}'")]
    UnsupportedExtension(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;
