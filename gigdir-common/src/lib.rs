//! # gigdir common library
//!
//! Shared code for the gigdir booking directory:
//! - Fixed catalogs (US states, genres) and form choice lists
//! - Venue, Artist and Show records, storage bootstrap and mutations
//! - Field validation and form objects
//! - Read-side queries (area grouping, search, detail pages)
//! - Bootstrap configuration loading

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod queries;
pub mod time;
pub mod validation;

pub use error::{Error, Result};
