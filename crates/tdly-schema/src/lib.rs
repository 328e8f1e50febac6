//! tdly property schemas
//!
//! Declarative descriptions of the property shape a document or item type
//! expects, and the recursive validator that confirms stored content matches
//! before an inflater trusts it.
//!
//! # Core Concepts
//!
//! - [`PropertySchema`] / [`PropertyRule`]: data-only schema, buildable in code
//!   or loaded with serde from JSON, YAML or TOML
//! - [`validate_properties`]: recursive check with full-path errors (`items[1].id`)
//! - [`ItemPropertyMap`]: validated lookup over an item's properties
//!
//! # Example
//!
//! ```rust,ignore
//! use tdly_schema::{PropertyRule, PropertySchema, validate_properties};
//!
//! let schema = PropertySchema::new()
//!     .with("guid", PropertyRule::string().required())
//!     .with("tags", PropertyRule::array_of(PropertyRule::string()));
//! validate_properties(&schema, &item.properties)?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod property_map;
mod schema;
mod validate;

pub use error::{PropertyError, SchemaError};
pub use property_map::ItemPropertyMap;
pub use schema::{ChildRule, PrimitiveKind, PropertyRule, PropertySchema, ANY_CHILDREN};
pub use validate::{validate_properties, validate_value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
