//! Integration tests for registry persistence
//!
//! Covers the load → upsert → save pipeline against real files:
//! - Missing registry file is treated as empty
//! - Malformed registry file is an error and is never overwritten
//! - Saved entries reload field-for-field
//! - Confirmed re-adds leave exactly one entry per name
//! - Items written by other tools are saved back unchanged

use reciter_common::catalog::{FormatMap, ReciterType, DEFAULT_AUDIO_FORMAT, SPECIAL_FORMAT};
use reciter_common::{CatalogEntry, Confirm, Error, Registry, UpsertOutcome};
use serde_json::{json, Value};
use tempfile::TempDir;

struct AlwaysYes;

impl Confirm for AlwaysYes {
    fn confirm(&mut self, _prompt: &str) -> std::io::Result<bool> {
        Ok(true)
    }
}

struct CountingNo(usize);

impl Confirm for CountingNo {
    fn confirm(&mut self, _prompt: &str) -> std::io::Result<bool> {
        self.0 += 1;
        Ok(false)
    }
}

fn special_surah_entry() -> CatalogEntry {
    let format_map: FormatMap = (1..=114)
        .map(|i| (i, format!("{:03}. Sure {}.mp3", i, i)))
        .collect();
    CatalogEntry::new(
        "Elmalılı Hamdi Yazır",
        "https://archive.org/download/meal/",
        SPECIAL_FORMAT,
        ReciterType::Surah,
        Some(format_map),
    )
}

#[test]
fn test_load_missing_file_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let registry = Registry::load(&temp_dir.path().join("custom-reciters.json")).unwrap();
    assert!(registry.is_empty());
}

#[test]
fn test_load_malformed_file_is_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom-reciters.json");
    std::fs::write(&path, "[{\"name\": \"broken\"").unwrap();

    let result = Registry::load(&path);
    assert!(matches!(result, Err(Error::Parse { .. })));

    // File must be left exactly as it was
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[{\"name\": \"broken\"");
}

#[test]
fn test_round_trip_preserves_entry() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom-reciters.json");

    let entry = special_surah_entry();
    let mut registry = Registry::new();
    registry.upsert(entry.clone(), &mut AlwaysYes).unwrap();
    registry.save(&path).unwrap();

    let reloaded = Registry::load(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get(&entry.name), Some(entry.clone()));

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("Elmalılı Hamdi Yazır"));
    assert!(raw.contains("\"114\": \"114. Sure 114.mp3\""));
    assert!(!temp_dir.path().join("custom-reciters.json.tmp").exists());
}

#[test]
fn test_confirmed_re_add_keeps_single_entry() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom-reciters.json");

    let first = CatalogEntry::new("Reciter", "https://a/", DEFAULT_AUDIO_FORMAT, ReciterType::Surah, None);
    let second = CatalogEntry::new("Reciter", "https://b/", DEFAULT_AUDIO_FORMAT, ReciterType::Surah, None);

    for entry in [first, second.clone()] {
        let mut registry = Registry::load(&path).unwrap();
        registry.upsert(entry, &mut AlwaysYes).unwrap();
        registry.save(&path).unwrap();
    }

    let registry = Registry::load(&path).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("Reciter"), Some(second));
}

#[test]
fn test_declined_overwrite_asks_once_and_keeps_old_entry() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom-reciters.json");

    let original = CatalogEntry::new("Reciter", "https://a/", DEFAULT_AUDIO_FORMAT, ReciterType::Juz, None);
    let mut registry = Registry::new();
    registry.upsert(original.clone(), &mut AlwaysYes).unwrap();
    registry.save(&path).unwrap();

    let mut registry = Registry::load(&path).unwrap();
    let mut confirm = CountingNo(0);
    let outcome = registry
        .upsert(
            CatalogEntry::new("Reciter", "https://b/", DEFAULT_AUDIO_FORMAT, ReciterType::Juz, None),
            &mut confirm,
        )
        .unwrap();

    assert_eq!(outcome, UpsertOutcome::Declined);
    assert_eq!(confirm.0, 1);
    assert_eq!(registry.get("Reciter"), Some(original));
}

#[test]
fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("dir").join("reciters.json");

    Registry::new().save(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
}

#[test]
fn test_foreign_entries_survive_merge() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom-reciters.json");
    let legacy = r#"{
    "name": "Legacy Cüz",
    "baseUrl": "https://archive.org/download/legacy/",
    "audioFormat": "%id%cuz.mp3",
    "note": "hand-written"
  }"#;
    std::fs::write(&path, format!("[\n  {}\n]", legacy)).unwrap();

    let mut registry = Registry::load(&path).unwrap();
    assert_eq!(registry.get("Legacy Cüz").unwrap().reciter_type, ReciterType::Juz);

    registry
        .upsert(
            CatalogEntry::new("New", "https://n/", DEFAULT_AUDIO_FORMAT, ReciterType::Surah, None),
            &mut AlwaysYes,
        )
        .unwrap();
    registry.save(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with(&format!("[\n  {},", legacy)));
    assert_eq!(raw.matches("\"type\"").count(), 1);
}

/// Save `items` as a registry, add one reciter, and return the saved array
fn merge_new_reciter_into(items: &str) -> Vec<Value> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom-reciters.json");
    std::fs::write(&path, items).unwrap();

    let mut registry = Registry::load(&path).unwrap();
    registry
        .upsert(
            CatalogEntry::new("New", "https://n/", DEFAULT_AUDIO_FORMAT, ReciterType::Surah, None),
            &mut AlwaysYes,
        )
        .unwrap();
    registry.save(&path).unwrap();

    serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap()
}

#[test]
fn test_capitalized_type_is_kept() {
    let item = json!({"name": "Caps", "baseUrl": "https://c/", "audioFormat": "%id%.mp3", "type": "Juz"});
    let saved = merge_new_reciter_into(&json!([item.clone()]).to_string());

    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0], item);
    assert_eq!(saved[1]["name"], "New");
}

#[test]
fn test_entry_missing_audio_format_is_kept() {
    let item = json!({"name": "Partial", "baseUrl": "https://p/"});
    let saved = merge_new_reciter_into(&json!([item.clone()]).to_string());

    assert_eq!(saved[0], item);
    assert_eq!(saved.len(), 2);
}

#[test]
fn test_non_numeric_format_map_key_is_kept() {
    let item = json!({
        "name": "Named",
        "baseUrl": "https://n/",
        "audioFormat": "%specialFormat%",
        "type": "surah",
        "hasSpecialFormat": true,
        "formatMap": {"fatiha": "001.mp3"}
    });
    let saved = merge_new_reciter_into(&json!([item.clone()]).to_string());

    assert_eq!(saved[0], item);
}

#[test]
fn test_zero_padded_format_map_keys_are_not_rewritten() {
    let item = json!({
        "name": "Padded",
        "baseUrl": "https://p/",
        "audioFormat": "%specialFormat%",
        "type": "juz",
        "hasSpecialFormat": true,
        "formatMap": {"01": "juz01.mp3", "02": "juz02.mp3"}
    });
    let saved = merge_new_reciter_into(&json!([item.clone()]).to_string());

    assert_eq!(saved[0]["formatMap"], json!({"01": "juz01.mp3", "02": "juz02.mp3"}));
}

#[test]
fn test_top_level_object_is_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom-reciters.json");
    std::fs::write(&path, r#"{"name": "A"}"#).unwrap();

    assert!(matches!(Registry::load(&path), Err(Error::Parse { .. })));
}
