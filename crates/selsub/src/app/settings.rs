//! Persistence for find/replace settings.
//!
//! Settings are stored as a flat JSON object of string values. Missing keys fall back to empty
//! strings and unknown keys are ignored. Files written by the older single-replacement layout
//! (`findText`, `findRegexp`, `regexpFlags`, `replace`) are imported on load.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::model::Settings;

/// On-disk shape accepted when loading, covering both current and legacy keys.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    #[serde(alias = "findText")]
    literal_find: Option<String>,
    literal_replace: Option<String>,
    #[serde(alias = "findRegexp")]
    regex_find: Option<String>,
    #[serde(alias = "regexpFlags")]
    regex_flags: Option<String>,
    regex_replace: Option<String>,
    replace: Option<String>,
}

impl StoredSettings {
    fn into_settings(self) -> Settings {
        let legacy_replace = self.replace.unwrap_or_default();
        Settings {
            literal_find: self.literal_find.unwrap_or_default(),
            literal_replace: self
                .literal_replace
                .unwrap_or_else(|| legacy_replace.clone()),
            regex_find: self.regex_find.unwrap_or_default(),
            regex_flags: self.regex_flags.unwrap_or_default(),
            regex_replace: self.regex_replace.unwrap_or(legacy_replace),
        }
    }
}

/// Parse settings JSON, applying defaults and legacy key mapping.
pub fn parse_settings(data: &str) -> Result<Settings> {
    let stored: StoredSettings = serde_json::from_str(data).context("invalid settings data")?;
    Ok(stored.into_settings())
}

/// Reads and writes [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the persisted settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted settings, or defaults when nothing has been saved yet.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read settings file at {}", self.path.display()))?;
        let settings = parse_settings(&data)
            .with_context(|| format!("invalid settings data in {}", self.path.display()))?;
        info!(path = %self.path.display(), "loaded settings");
        Ok(settings)
    }

    /// Persist `settings`, creating parent directories as needed.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| {
                format!("failed to create settings directory {}", dir.display())
            })?;
        }

        let data =
            serde_json::to_string_pretty(settings).context("failed to serialize settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write settings file to {}", self.path.display()))?;
        debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = SettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load()?, Settings::default());
        Ok(())
    }

    #[test]
    fn save_then_load_restores_settings() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = SettingsStore::new(dir.path().join("nested/settings.json"));
        let settings = Settings {
            literal_find: "aaa".into(),
            literal_replace: "x".into(),
            regex_find: r"(\w+)\s(\w+)".into(),
            regex_flags: "g".into(),
            regex_replace: "$2, $1".into(),
        };

        store.save(&settings)?;
        assert_eq!(store.load()?, settings);
        Ok(())
    }

    #[test]
    fn serialized_layout_is_flat_camel_case() -> Result<()> {
        let settings = Settings {
            literal_find: "a".into(),
            regex_flags: "gi".into(),
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings)?;
        assert_snapshot!(json, @r#"{"literalFind":"a","literalReplace":"","regexFind":"","regexFlags":"gi","regexReplace":""}"#);
        Ok(())
    }

    #[test]
    fn missing_keys_default_and_unknown_keys_are_ignored() -> Result<()> {
        let settings = parse_settings(r#"{"regexFind":"x+","theme":"dark"}"#)?;
        assert_eq!(settings.regex_find, "x+");
        assert_eq!(settings.literal_find, "");
        assert_eq!(settings.regex_replace, "");
        Ok(())
    }

    #[test]
    fn legacy_keys_are_imported() -> Result<()> {
        let settings = parse_settings(
            r#"{"findText":"foo","findRegexp":"(a)","regexpFlags":"gm","replace":"$1"}"#,
        )?;
        assert_eq!(settings.literal_find, "foo");
        assert_eq!(settings.regex_find, "(a)");
        assert_eq!(settings.regex_flags, "gm");
        assert_eq!(settings.literal_replace, "$1");
        assert_eq!(settings.regex_replace, "$1");
        Ok(())
    }

    #[test]
    fn current_keys_win_over_legacy_replace() -> Result<()> {
        let settings = parse_settings(r#"{"replace":"old","regexReplace":"new"}"#)?;
        assert_eq!(settings.regex_replace, "new");
        assert_eq!(settings.literal_replace, "old");
        Ok(())
    }

    #[test]
    fn corrupt_file_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json")?;
        assert!(SettingsStore::new(path).load().is_err());
        Ok(())
    }
}
