//! tdly typed values
//!
//! The lowest layer of the document pipeline: the loosely-typed values that
//! stored documents are made of, the rules every `type` discriminant obeys,
//! and the content hash used to tell two serialized documents apart.
//!
//! # Core Concepts
//!
//! - [`PropertyValue`]: primitive / sequence / mapping / absent, with nulls
//!   normalized away by [`PropertyValue::from_raw`]
//! - [`check_typed`], [`check_of_type`], [`check_one_of`]: type-tag validation
//! - [`ContentHash`]: SHA-256 digest rendered as lowercase hex

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod hash;
mod tag;
mod value;

pub use hash::ContentHash;
pub use tag::{
    check_of_type, check_one_of, check_tag, check_typed, is_of_type, is_typed, TypeTagError,
    TYPE_KEY,
};
pub use value::{serialize_present_entries, PropertyMap, PropertyValue, ValueKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
