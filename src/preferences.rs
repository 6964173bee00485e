//! Local preferences
//!
//! Settings and flashcards kept on this machine in a JSON file under the
//! user config directory. Keys keep the names the web client used, so a
//! file exported from the browser can be dropped in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::practice::SentencePair;

pub const PREFERENCES_FILE: &str = "preferences.json";

/// A sentence saved for flashcard review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub target_lang: String,
    pub native_lang: String,
    pub added: DateTime<Utc>,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub folder: String,
}

impl Flashcard {
    pub fn from_sentence(pair: &SentencePair, folder: &str, file: &str, added: DateTime<Utc>) -> Self {
        Self {
            target_lang: pair.target_lang.clone(),
            native_lang: pair.native_lang.clone(),
            added,
            file: file.to_string(),
            folder: folder.to_string(),
        }
    }

    fn same_sentence(&self, other: &Flashcard) -> bool {
        self.target_lang == other.target_lang && self.native_lang == other.native_lang
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddFlashcard {
    Added,
    AlreadyPresent,
}

/// Contents of the preferences file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(rename = "quizMode", default, skip_serializing_if = "Option::is_none")]
    pub quiz_mode: Option<String>,

    #[serde(rename = "audioEnabled", default, skip_serializing_if = "Option::is_none")]
    pub audio_enabled: Option<bool>,

    #[serde(default)]
    pub flashcards: Vec<Flashcard>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    #[serde(rename = "subscriptionStartDate", default, skip_serializing_if = "Option::is_none")]
    pub subscription_start_date: Option<String>,

    #[serde(rename = "nextBillingDate", default, skip_serializing_if = "Option::is_none")]
    pub next_billing_date: Option<String>,

    /// Keys this version does not know about
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Preferences {
    /// Add a flashcard unless the same sentence pair is already saved
    pub fn add_flashcard(&mut self, card: Flashcard) -> AddFlashcard {
        if self.flashcards.iter().any(|c| c.same_sentence(&card)) {
            return AddFlashcard::AlreadyPresent;
        }
        self.flashcards.push(card);
        AddFlashcard::Added
    }

    pub fn remove_flashcard(&mut self, index: usize) -> Option<Flashcard> {
        (index < self.flashcards.len()).then(|| self.flashcards.remove(index))
    }
}

/// The preferences file
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{config_dir}/typorax/preferences.json`
    pub fn open_default() -> PreferencesResult<Self> {
        let dir = dirs::config_dir().ok_or(PreferencesError::NoConfigDir)?;
        Ok(Self::at(dir.join("typorax").join(PREFERENCES_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file; a missing or unreadable file gives defaults
    pub fn load(&self) -> PreferencesResult<Preferences> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Preferences::default()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(preferences) => Ok(preferences),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt preferences, using defaults");
                Ok(Preferences::default())
            }
        }
    }

    pub fn save(&self, preferences: &Preferences) -> PreferencesResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(preferences)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Load, add and save when the card is new
    pub fn add_flashcard(&self, card: Flashcard) -> PreferencesResult<AddFlashcard> {
        let mut preferences = self.load()?;
        let outcome = preferences.add_flashcard(card);
        if outcome == AddFlashcard::Added {
            self.save(&preferences)?;
        }
        Ok(outcome)
    }

    /// Add several sentences at once, returning how many were new
    pub fn import_flashcards(
        &self,
        pairs: &[SentencePair],
        folder: &str,
        file: &str,
        added: DateTime<Utc>,
    ) -> PreferencesResult<usize> {
        let mut preferences = self.load()?;
        let new = pairs
            .iter()
            .map(|pair| preferences.add_flashcard(Flashcard::from_sentence(pair, folder, file, added)))
            .filter(|outcome| *outcome == AddFlashcard::Added)
            .count();
        if new > 0 {
            self.save(&preferences)?;
        }
        Ok(new)
    }

    /// Write the flashcards alone, as the web client's download did
    pub fn export_flashcards(&self, path: &Path) -> PreferencesResult<usize> {
        let preferences = self.load()?;
        if preferences.flashcards.is_empty() {
            return Err(PreferencesError::NoFlashcards);
        }
        let content = serde_json::to_string_pretty(&preferences.flashcards)?;
        std::fs::write(path, content)?;
        Ok(preferences.flashcards.len())
    }
}

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("No user config directory on this system")]
    NoConfigDir,

    #[error("No flashcards to export")]
    NoFlashcards,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PreferencesResult<T> = Result<T, PreferencesError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn card(target: &str, native: &str) -> Flashcard {
        Flashcard::from_sentence(
            &SentencePair::new(target, native),
            "Week 1",
            "les1.md",
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_add_flashcard_dedupes_on_pair() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.add_flashcard(card("De kat.", "The cat.")), AddFlashcard::Added);
        assert_eq!(
            prefs.add_flashcard(card("De kat.", "The cat.")),
            AddFlashcard::AlreadyPresent
        );
        assert_eq!(prefs.add_flashcard(card("De kat.", "A cat.")), AddFlashcard::Added);
        assert_eq!(prefs.flashcards.len(), 2);

        assert!(prefs.remove_flashcard(5).is_none());
        assert_eq!(prefs.remove_flashcard(0).unwrap().native_lang, "The cat.");
    }

    #[test]
    fn test_browser_keys_round_trip() {
        let json = r#"{
            "theme": "dark",
            "quizMode": "true",
            "audioEnabled": false,
            "flashcards": [],
            "nextBillingDate": "2024-06-01",
            "sidebarCollapsed": true
        }"#;

        let prefs: Preferences = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.theme.as_deref(), Some("dark"));
        assert_eq!(prefs.audio_enabled, Some(false));
        assert_eq!(prefs.extra.get("sidebarCollapsed"), Some(&Value::Bool(true)));

        let written = serde_json::to_value(&prefs).unwrap();
        assert_eq!(written["quizMode"], "true");
        assert_eq!(written["sidebarCollapsed"], true);
        assert!(written.get("openai_api_key").is_none());
    }

    #[test]
    fn test_store_persists_cards() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::at(dir.path().join("typorax").join(PREFERENCES_FILE));

        assert_eq!(store.load().unwrap(), Preferences::default());
        assert_eq!(store.add_flashcard(card("Ik ben Inge.", "I am Inge.")).unwrap(), AddFlashcard::Added);
        assert_eq!(
            store.add_flashcard(card("Ik ben Inge.", "I am Inge.")).unwrap(),
            AddFlashcard::AlreadyPresent
        );
        assert_eq!(store.load().unwrap().flashcards.len(), 1);

        let export = dir.path().join("flashcards.json");
        assert_eq!(store.export_flashcards(&export).unwrap(), 1);
        let cards: Vec<Flashcard> =
            serde_json::from_str(&std::fs::read_to_string(export).unwrap()).unwrap();
        assert_eq!(cards[0].folder, "Week 1");
    }

    #[test]
    fn test_import_pasted_table() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::at(dir.path().join(PREFERENCES_FILE));
        store.add_flashcard(card("De kat.", "The cat.")).unwrap();

        let pasted = "| Target | Native |\n|---|---|\n| De kat. | The cat. |\n| Het huis. | The house. |\n| Leeg | |\n";
        let pairs = crate::practice::table::parse_pasted_table(pasted);
        let added = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();

        assert_eq!(store.import_flashcards(&pairs, "", "plak.md", added).unwrap(), 1);
        let cards = store.load().unwrap().flashcards;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].target_lang, "Het huis.");
        assert_eq!(cards[1].file, "plak.md");

        assert_eq!(store.import_flashcards(&pairs, "", "plak.md", added).unwrap(), 0);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        std::fs::write(&path, "{not json").unwrap();

        let store = PreferenceStore::at(&path);
        assert_eq!(store.load().unwrap(), Preferences::default());
        assert!(matches!(
            store.export_flashcards(&dir.path().join("out.json")),
            Err(PreferencesError::NoFlashcards)
        ));
    }
}
