//! Model configuration

use crate::error::ModelResult;
use crate::serializer::{DocumentSerializer, JsonDocumentSerializer, YamlDocumentSerializer};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Default maximum document size (10MB)
pub const DEFAULT_MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Configuration for a [`Model`](crate::Model)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Root folder (or key prefix) documents are stored under
    pub base_path: PathBuf,
    /// Largest document storage will read, in bytes
    pub max_document_size: u64,
    /// Extension selecting the document format (`yml`, `yaml` or `json`)
    pub default_extension: String,
}

impl ModelConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base path
    #[inline]
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// With maximum document size in bytes
    #[inline]
    #[must_use]
    pub fn with_max_document_size(mut self, max: u64) -> Self {
        self.max_document_size = max;
        self
    }

    /// With default extension
    #[inline]
    #[must_use]
    pub fn with_default_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into();
        self
    }

    /// Parse configuration from TOML; missing keys take their defaults
    ///
    /// # Errors
    /// [`ModelError::Config`](crate::ModelError::Config) if the TOML is malformed.
    pub fn from_toml_str(content: &str) -> ModelResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serializer for [`ModelConfig::default_extension`], if it names a known format
    #[must_use]
    pub fn serializer(&self) -> Option<Arc<dyn DocumentSerializer>> {
        match self.default_extension.trim_start_matches('.') {
            "yml" | "yaml" => Some(Arc::new(YamlDocumentSerializer)),
            "json" => Some(Arc::new(JsonDocumentSerializer)),
            _ => None,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
            default_extension: "yml".to_string(),
        }
    }
}
