//! Common utilities for typed-collection
//!
//! This crate provides the error type shared by the schema layer and the
//! collection builder.

pub mod error;

pub use error::{CollectionError, Result};
