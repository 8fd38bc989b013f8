//! Common types for nodex.
//!
//! This crate provides the foundational types shared by all nodex crates:
//!
//! - [`NodeVariantRecord`] - One node's data in one dimension combination
//! - [`Dimensions`] - Dimension name to ordered value list mapping
//! - [`PropertyValue`] - Loosely typed node property values
//! - [`path`] - Content path helpers and the deterministic path sort key

mod dimension;
mod error;
mod record;

pub mod path;

pub use dimension::Dimensions;
pub use error::{Error, Result};
pub use record::{NodeVariantRecord, PropertyValue, LIVE_WORKSPACE};
