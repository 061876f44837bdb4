//! Persisted locale preference.
//!
//! A single string under [`LOCALE_KEY`], read once at startup and written on
//! every locale switch. [`FilePreferences`] keeps it in a small JSON object
//! on disk; a missing or unreadable file reads as "no preference".

use crate::content::ContentDocument;
use crate::i18n;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage key for the locale preference.
pub const LOCALE_KEY: &str = "site-lang";

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client-local string storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// JSON-file backed preferences.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferences {
    /// Open the store at `path`. Never fails: a missing or corrupt file is
    /// treated as empty and overwritten on the next write.
    pub fn open(path: &Path) -> Self {
        let values = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            values,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory preferences, for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Decide the startup locale.
///
/// A stored preference wins if the document has that locale. Otherwise the
/// locale is detected from the browser language (falling back to the first
/// available locale) and persisted.
pub fn initial_locale(
    prefs: &mut impl PreferenceStore,
    document: &ContentDocument,
    browser_language: Option<&str>,
) -> Result<String, PrefsError> {
    if let Some(stored) = prefs.get(LOCALE_KEY).filter(|l| document.contains(l)) {
        return Ok(stored);
    }
    let detected = i18n::detect_locale(browser_language);
    let locale = if document.contains(detected) {
        detected.to_string()
    } else {
        document
            .locales()
            .next()
            .unwrap_or(detected)
            .to_string()
    };
    prefs.set(LOCALE_KEY, &locale)?;
    Ok(locale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_document;
    use tempfile::TempDir;

    #[test]
    fn file_preferences_round_trip_through_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/prefs.json");

        let mut prefs = FilePreferences::open(&path);
        assert_eq!(prefs.get(LOCALE_KEY), None);
        prefs.set(LOCALE_KEY, "pt").unwrap();

        let reopened = FilePreferences::open(&path);
        assert_eq!(reopened.get(LOCALE_KEY).as_deref(), Some("pt"));
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");
        std::fs::write(&path, "{{{").unwrap();

        let prefs = FilePreferences::open(&path);
        assert_eq!(prefs.get(LOCALE_KEY), None);
    }

    #[test]
    fn stored_preference_wins() {
        let document = sample_document();
        let mut prefs = MemoryPreferences::default();
        prefs.set(LOCALE_KEY, "pt").unwrap();

        let locale = initial_locale(&mut prefs, &document, Some("en-US")).unwrap();
        assert_eq!(locale, "pt");
    }

    #[test]
    fn detected_locale_is_persisted() {
        let document = sample_document();
        let mut prefs = MemoryPreferences::default();

        let locale = initial_locale(&mut prefs, &document, Some("pt-BR")).unwrap();
        assert_eq!(locale, "pt");
        assert_eq!(prefs.get(LOCALE_KEY).as_deref(), Some("pt"));
    }

    #[test]
    fn stale_preference_is_replaced() {
        let document = sample_document();
        let mut prefs = MemoryPreferences::default();
        prefs.set(LOCALE_KEY, "fr").unwrap();

        let locale = initial_locale(&mut prefs, &document, None).unwrap();
        assert_eq!(locale, "en");
        assert_eq!(prefs.get(LOCALE_KEY).as_deref(), Some("en"));
    }
}
