//! reciter-import library interface
//!
//! Exposes the import stages for the binary and for integration testing.

pub mod error;
pub mod extractor;
pub mod fetch;
pub mod import;
pub mod pattern;
pub mod prompt;

pub use crate::error::{ImportError, ImportResult};
pub use crate::extractor::{extract_audio_records, AudioRecord};
pub use crate::import::{import_page, merge_into_registry, scan_page, ImportRequest, PageScan};
pub use crate::pattern::{infer_pattern, PatternInfo};
