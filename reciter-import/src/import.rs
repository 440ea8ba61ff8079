//! Import pipeline
//!
//! page markup → audio records → pattern → catalog entry → registry.
//! Each stage is a plain function so the whole flow after the network fetch
//! runs offline in tests.

use crate::error::{ImportError, ImportResult};
use crate::extractor::{extract_audio_records, AudioRecord};
use crate::pattern::{infer_pattern, PatternInfo};
use reciter_common::human_time::{format_human_time, total_duration};
use reciter_common::{CatalogEntry, Confirm, Registry, UpsertOutcome};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Everything learned from one item page
#[derive(Debug, Clone)]
pub struct PageScan {
    pub records: Vec<AudioRecord>,
    pub pattern: PatternInfo,
}

impl PageScan {
    /// Sum of the durations the page declares, in seconds
    pub fn total_duration(&self) -> Option<f64> {
        total_duration(self.records.iter().filter_map(|r| r.duration.as_deref()))
    }
}

/// Extract records from `html` and infer their pattern
pub fn scan_page(html: &str) -> ImportResult<PageScan> {
    let records = extract_audio_records(html);
    if records.is_empty() {
        return Err(ImportError::ExtractionEmpty);
    }
    info!("Extracted {} MP3 records", records.len());

    let pattern = infer_pattern(&records)?;
    Ok(PageScan { records, pattern })
}

/// Load the registry at `path`, add or replace `entry`, and save.
///
/// The file is not written when the user declines the overwrite.
pub fn merge_into_registry(
    path: &Path,
    entry: CatalogEntry,
    confirm: &mut dyn Confirm,
) -> ImportResult<UpsertOutcome> {
    let mut registry = Registry::load(path)?;

    let outcome = registry.upsert(entry, confirm)?;
    if outcome == UpsertOutcome::Declined {
        info!("Overwrite declined; {} left unchanged", path.display());
        return Ok(outcome);
    }

    registry.save(path)?;
    Ok(outcome)
}

/// One import run over already fetched page markup
#[derive(Debug, Clone)]
pub struct ImportRequest<'a> {
    /// Display name of the reciter
    pub name: &'a str,
    /// Registry file to merge into
    pub output: &'a Path,
    /// Print the entry only, leave the registry alone
    pub dry_run: bool,
}

/// Scan `html`, print the resulting entry to `out` and merge it into the
/// registry unless this is a dry run.
///
/// Returns the merge outcome, or `None` for a dry run. The registry is not
/// touched when nothing usable was found on the page.
pub fn import_page(
    html: &str,
    request: &ImportRequest<'_>,
    confirm: &mut dyn Confirm,
    out: &mut dyn Write,
) -> ImportResult<Option<UpsertOutcome>> {
    writeln!(out, "Extracting MP3 links...")?;
    let scan = scan_page(html)?;
    writeln!(out, "Found {} MP3 files", scan.records.len())?;
    if let Some(total) = scan.total_duration() {
        // Always H:MM:SS, whatever the total
        writeln!(out, "Total duration: {}", format_human_time(total.round() as i64, i64::MAX))?;
    }

    let entry = scan.pattern.into_entry(request.name);
    let json = serde_json::to_string_pretty(&entry).map_err(std::io::Error::from)?;
    writeln!(out, "\nReciter entry:\n{}", json)?;

    if request.dry_run {
        writeln!(out, "\n(Dry run - not adding to file)")?;
        return Ok(None);
    }

    writeln!(out, "\nLoading {}...", request.output.display())?;
    let outcome = merge_into_registry(request.output, entry, confirm)?;
    match outcome {
        UpsertOutcome::Declined => writeln!(out, "Cancelled")?,
        UpsertOutcome::Added => writeln!(
            out,
            "Successfully added '{}' to {}",
            request.name,
            request.output.display()
        )?,
        UpsertOutcome::Replaced => writeln!(
            out,
            "Successfully replaced '{}' in {}",
            request.name,
            request.output.display()
        )?,
    }
    Ok(Some(outcome))
}
