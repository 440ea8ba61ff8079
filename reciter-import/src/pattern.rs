//! Filename pattern inference
//!
//! Derives the catalog fields for a reciter from the list of extracted MP3
//! URLs:
//! - base URL: directory of the first URL
//! - type: juz for at most 30 files, surah otherwise
//! - audio format: `%specialFormat%` with an explicit per-index map when the
//!   filenames carry their index, else a template or literal filename
//!
//! Juz maps may be partial: any `juz<N>` match is informative. Surah maps must
//! cover every file, because a leading number can just as well be a reciter
//! or album code; a partial surah map falls back to `%id%.mp3`.

use crate::error::{ImportError, ImportResult};
use crate::extractor::AudioRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use reciter_common::catalog::{DEFAULT_AUDIO_FORMAT, SPECIAL_FORMAT};
use reciter_common::{CatalogEntry, FormatMap, ReciterType};
use tracing::{debug, info, warn};

// Indices are ASCII digits only; `\d` would also match other scripts' digits
static JUZ_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)juz([0-9]+)").expect("juz pattern is valid"));

static SURAH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\.").expect("surah pattern is valid"));

/// Inferred naming convention for one reciter
#[derive(Debug, Clone, PartialEq)]
pub struct PatternInfo {
    pub base_url: String,
    pub audio_format: String,
    pub reciter_type: ReciterType,
    pub has_special_format: bool,
    pub format_map: Option<FormatMap>,
}

impl PatternInfo {
    /// Build the registry entry for display name `name`
    pub fn into_entry(self, name: impl Into<String>) -> CatalogEntry {
        let format_map = if self.has_special_format {
            self.format_map
        } else {
            None
        };
        CatalogEntry::new(
            name,
            self.base_url,
            self.audio_format,
            self.reciter_type,
            format_map,
        )
    }
}

/// Infer the naming pattern of `records`.
///
/// All records are assumed to live in the first record's directory; records
/// that do not are only reported.
pub fn infer_pattern(records: &[AudioRecord]) -> ImportResult<PatternInfo> {
    let first = records
        .first()
        .ok_or_else(|| ImportError::PatternUndetermined("no MP3 links to analyze".to_string()))?;

    let base_url = base_url_of(&first.url).ok_or_else(|| {
        ImportError::PatternUndetermined(format!("URL has no directory part: {}", first.url))
    })?;

    let outside = records
        .iter()
        .filter(|r| !r.url.starts_with(&base_url))
        .count();
    if outside > 0 {
        warn!(
            "{} of {} files are not under {}; their URLs will not resolve",
            outside,
            records.len(),
            base_url
        );
    }

    let reciter_type = ReciterType::for_file_count(records.len());
    let filenames: Vec<&str> = records.iter().map(|r| filename_of(&r.url)).collect();
    debug!(count = filenames.len(), %reciter_type, "Inferring filename pattern");

    let (audio_format, format_map) = match reciter_type {
        ReciterType::Juz => infer_juz_format(&filenames),
        ReciterType::Surah => infer_surah_format(&filenames),
    };

    Ok(PatternInfo {
        base_url,
        audio_format,
        reciter_type,
        has_special_format: format_map.is_some(),
        format_map,
    })
}

/// Everything up to and including the last `/`
fn base_url_of(url: &str) -> Option<String> {
    url.rfind('/').map(|i| url[..=i].to_string())
}

/// Segment after the last `/`
fn filename_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Canonical index key: digits with leading zeros removed
fn index_of(digits: &str) -> Option<u32> {
    digits.parse().ok()
}

fn infer_juz_format(filenames: &[&str]) -> (String, Option<FormatMap>) {
    let mut format_map = FormatMap::new();
    for filename in filenames {
        let index = JUZ_PATTERN
            .captures(filename)
            .and_then(|caps| index_of(&caps[1]));
        if let Some(index) = index {
            format_map.insert(index, filename.to_string());
        }
    }

    if format_map.is_empty() {
        let literal = filenames.first().copied().unwrap_or_default();
        info!("No juz numbering in filenames; using {:?} as audio format", literal);
        return (literal.to_string(), None);
    }

    info!("Mapped {} of {} files to juz numbers", format_map.len(), filenames.len());
    if format_map.len() < filenames.len() {
        warn!(
            "Only {} of {} files carry a juz number; unmapped parts will not play",
            format_map.len(),
            filenames.len()
        );
    }
    (SPECIAL_FORMAT.to_string(), Some(format_map))
}

fn infer_surah_format(filenames: &[&str]) -> (String, Option<FormatMap>) {
    let mut format_map = FormatMap::new();
    for filename in filenames {
        let index = SURAH_PATTERN
            .captures(filename)
            .and_then(|caps| index_of(&caps[1]));
        if let Some(index) = index {
            format_map.insert(index, decode_filename(filename));
        }
    }

    if !format_map.is_empty() && format_map.len() == filenames.len() {
        info!("Every file carries its surah number; using explicit format map");
        return (SPECIAL_FORMAT.to_string(), Some(format_map));
    }

    if !format_map.is_empty() {
        info!(
            "Only {} of {} files matched a surah number; falling back to {}",
            format_map.len(),
            filenames.len(),
            DEFAULT_AUDIO_FORMAT
        );
    }
    (DEFAULT_AUDIO_FORMAT.to_string(), None)
}

/// Percent-decode a filename; keep it raw if the result is not UTF-8
fn decode_filename(filename: &str) -> String {
    urlencoding::decode(filename)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| filename.to_string())
}
