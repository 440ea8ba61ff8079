//! Catalog entry model
//!
//! A `CatalogEntry` describes where a reciter's audio files live and how the
//! per-part filename is built. Entries are serialized with the camelCase keys
//! the player reads from `custom-reciters.json`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder format meaning "look the filename up in `formatMap`"
pub const SPECIAL_FORMAT: &str = "%specialFormat%";

/// Placeholder replaced by the zero-padded part index
pub const ID_PLACEHOLDER: &str = "%id%";

/// Generic index-based template used when filenames follow no explicit pattern
pub const DEFAULT_AUDIO_FORMAT: &str = "%id%.mp3";

/// Explicit per-index filename table.
///
/// Keys serialize as JSON strings (`"1"`, `"114"`); ordering is numeric.
pub type FormatMap = BTreeMap<u32, String>;

/// How a reciter's recording is segmented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReciterType {
    /// Split into the 30 juz parts
    Juz,
    /// Split by the 114 surahs
    Surah,
}

impl ReciterType {
    /// Number of juz parts
    pub const JUZ_COUNT: u32 = 30;
    /// Number of surahs
    pub const SURAH_COUNT: u32 = 114;

    /// Classify a recording by how many files it consists of.
    ///
    /// A recitation split by juz never has more than 30 files.
    pub fn for_file_count(count: usize) -> Self {
        if count <= Self::JUZ_COUNT as usize {
            ReciterType::Juz
        } else {
            ReciterType::Surah
        }
    }

    /// Highest valid part index for this type
    pub fn part_count(self) -> u32 {
        match self {
            ReciterType::Juz => Self::JUZ_COUNT,
            ReciterType::Surah => Self::SURAH_COUNT,
        }
    }

    /// Zero-padding width the player uses when substituting `%id%`
    pub fn id_width(self) -> usize {
        match self {
            ReciterType::Juz => 2,
            ReciterType::Surah => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReciterType::Juz => "juz",
            ReciterType::Surah => "surah",
        }
    }

    /// Guess the type of an entry that was stored without one.
    ///
    /// Mirrors the player's fallback: juz if the name mentions "juz"/"cüz"
    /// or the audio format mentions "juz"/"cuz".
    pub fn guess(name: &str, audio_format: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("juz")
            || name.contains("cüz")
            || audio_format.contains("juz")
            || audio_format.contains("cuz")
        {
            ReciterType::Juz
        } else {
            ReciterType::Surah
        }
    }
}

impl fmt::Display for ReciterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reciter in the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredEntry")]
pub struct CatalogEntry {
    /// Display name, also the registry key
    pub name: String,
    /// Directory URL ending in `/`
    pub base_url: String,
    /// Filename template, literal filename or `%specialFormat%`
    pub audio_format: String,
    #[serde(rename = "type")]
    pub reciter_type: ReciterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_special_format: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_map: Option<FormatMap>,
    /// Fields written by other tools, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// On-disk shape, tolerant of entries written without a `type`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    name: String,
    base_url: String,
    audio_format: String,
    #[serde(rename = "type", default)]
    reciter_type: Option<ReciterType>,
    #[serde(default)]
    has_special_format: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_format_map")]
    format_map: Option<FormatMap>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Parse string keys explicitly; integer map keys do not survive the
/// buffering `flatten` does.
fn deserialize_format_map<'de, D>(deserializer: D) -> Result<Option<FormatMap>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, String>> = Option::deserialize(deserializer)?;
    raw.map(|map| {
        map.into_iter()
            .map(|(key, filename)| {
                key.trim()
                    .parse::<u32>()
                    .map(|index| (index, filename))
                    .map_err(|_| {
                        serde::de::Error::custom(format!("formatMap key is not an index: {:?}", key))
                    })
            })
            .collect()
    })
    .transpose()
}

impl From<StoredEntry> for CatalogEntry {
    fn from(stored: StoredEntry) -> Self {
        let reciter_type = stored
            .reciter_type
            .unwrap_or_else(|| ReciterType::guess(&stored.name, &stored.audio_format));
        Self {
            name: stored.name,
            base_url: stored.base_url,
            audio_format: stored.audio_format,
            reciter_type,
            has_special_format: stored.has_special_format,
            format_map: stored.format_map,
            extra: stored.extra,
        }
    }
}

impl CatalogEntry {
    /// Create a new entry.
    ///
    /// `hasSpecialFormat` and `formatMap` are only set when a non-empty map is
    /// given, so the two fields are always present together.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        audio_format: impl Into<String>,
        reciter_type: ReciterType,
        format_map: Option<FormatMap>,
    ) -> Self {
        let format_map = format_map.filter(|map| !map.is_empty());
        Self {
            name: name.into(),
            base_url: base_url.into(),
            audio_format: audio_format.into(),
            reciter_type,
            has_special_format: format_map.as_ref().map(|_| true),
            format_map,
            extra: Map::new(),
        }
    }

    /// True if filenames come from the explicit format map
    pub fn uses_special_format(&self) -> bool {
        self.has_special_format == Some(true) && self.audio_format == SPECIAL_FORMAT
    }

    /// Filename for part `index`, or None if the index is out of range or
    /// missing from the format map.
    pub fn filename_for(&self, index: u32) -> Option<String> {
        if index == 0 || index > self.reciter_type.part_count() {
            return None;
        }

        if self.uses_special_format() {
            return self.format_map.as_ref()?.get(&index).cloned();
        }

        let padded = format!("{:0width$}", index, width = self.reciter_type.id_width());
        Some(self.audio_format.replace(ID_PLACEHOLDER, &padded))
    }

    /// Full playback URL for part `index`
    pub fn resolve_url(&self, index: u32) -> Option<String> {
        self.filename_for(index)
            .map(|filename| format!("{}{}", self.base_url, filename))
    }
}
