//! # Reciter Common Library
//!
//! Shared code for the reciter catalog tools including:
//! - Catalog entry model (`CatalogEntry`, `ReciterType`)
//! - Registry loading, merging and atomic saving
//! - Configuration loading
//! - Duration parsing and human-readable formatting

pub mod catalog;
pub mod config;
pub mod error;
pub mod human_time;
pub mod registry;

pub use catalog::{CatalogEntry, FormatMap, ReciterType};
pub use error::{Error, Result};
pub use registry::{Confirm, Registry, StoredItem, UpsertOutcome};
