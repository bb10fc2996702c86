//! # CMX Common Library
//!
//! Shared code for the Changelog Matrix application including:
//! - Domain model (taxonomy tags, features, products)
//! - Tag matrix flattening and membership queries
//! - Feature date parsing
//! - Auxiliary document types (summary, update logs, admin config)
//! - Configuration loading
//! - Error types

pub mod config;
pub mod dates;
pub mod docs;
pub mod error;
pub mod matrix;
pub mod model;

pub use error::{Error, Result};
pub use model::OTHER_SUBTAG;
