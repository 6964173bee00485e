//! Per-user file store
//!
//! Backing storage of the reference backend. One directory per user:
//!
//! ```text
//! {data_dir}/{user}/
//!   {folder}/{lesson}.md
//!   {folder}/{lesson}.md_progress.json
//!   word bank/wordbank_organized.md
//!   word bank/wordbank_saved.md
//!   typo.json
//!   learning_progress.json
//! ```
//!
//! Folder and file names come from request parameters and are checked so
//! they cannot escape the user directory.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::assessment::{LessonProgress, TestAttempt};
use crate::practice::wordbank::append_entry;
use crate::practice::{ProgressRecord, TypoEntry, WordEntry};

pub const WORDBANK_FOLDER: &str = "word bank";
pub const WORDBANK_FILE: &str = "wordbank_organized.md";
pub const SAVED_WORDS_FILE: &str = "wordbank_saved.md";
pub const TYPO_FILE: &str = "typo.json";
pub const LEARNING_PROGRESS_FILE: &str = "learning_progress.json";

/// Errors that can occur in the user store
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Folder or file name is empty or could escape the user directory
    #[error("Invalid name: {0:?}")]
    InvalidName(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// File name of a lesson's practice progress
pub fn progress_file_name(filename: &str) -> String {
    format!("{}_progress.json", filename)
}

/// Files of one user
#[derive(Debug, Clone)]
pub struct UserStore {
    root: PathBuf,
}

impl UserStore {
    /// Open the store of `username` under `data_dir`, creating it if needed
    pub fn open(data_dir: &Path, username: &str) -> StoreResult<Self> {
        validate_name(username)?;
        let root = data_dir.join(username);
        std::fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "Opened user store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn folder_dir(&self, folder: &str) -> StoreResult<PathBuf> {
        if folder.is_empty() {
            return Ok(self.root.clone());
        }
        validate_name(folder)?;
        Ok(self.root.join(folder))
    }

    fn file_path(&self, folder: &str, file: &str) -> StoreResult<PathBuf> {
        validate_name(file)?;
        Ok(self.folder_dir(folder)?.join(file))
    }

    /// Visible folders, sorted
    pub fn list_folders(&self) -> StoreResult<Vec<String>> {
        let mut folders = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_dir() && !name.starts_with('.') {
                folders.push(name);
            }
        }
        folders.sort();
        Ok(folders)
    }

    /// Markdown files of a folder, sorted; a missing folder has none
    pub fn list_files(&self, folder: &str) -> StoreResult<Vec<String>> {
        let dir = self.folder_dir(folder)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_file() && name.ends_with(".md") {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Read a text file, `None` when it does not exist
    pub fn read_text(&self, folder: &str, file: &str) -> StoreResult<Option<String>> {
        let path = self.file_path(folder, file)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn write_text(&self, folder: &str, file: &str, content: &str) -> StoreResult<()> {
        let path = self.file_path(folder, file)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(())
    }

    // ============================================
    // Practice progress
    // ============================================

    /// Progress of a lesson; missing or unreadable progress is empty
    pub fn load_practice_progress(&self, folder: &str, filename: &str) -> StoreResult<ProgressRecord> {
        let Some(content) = self.read_text(folder, &progress_file_name(filename))? else {
            return Ok(ProgressRecord::new());
        };

        match serde_json::from_str(&content) {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::warn!(folder, filename, error = %e, "Unreadable progress file, starting fresh");
                Ok(ProgressRecord::new())
            }
        }
    }

    pub fn save_practice_progress(
        &self,
        folder: &str,
        filename: &str,
        record: &ProgressRecord,
    ) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(record)?;
        self.write_text(folder, &progress_file_name(filename), &content)?;
        tracing::info!(folder, filename, keys = record.len(), "Saved practice progress");
        Ok(())
    }

    // ============================================
    // Test history
    // ============================================

    /// All lessons' test history keyed by `"{folder}/{lesson}"`
    ///
    /// Attempts that do not decode are skipped here but stay in the file.
    pub fn load_learning_progress(&self) -> StoreResult<BTreeMap<String, LessonProgress>> {
        let root = match self.read_json(LEARNING_PROGRESS_FILE) {
            Ok(Some(root)) => root,
            Ok(None) => return Ok(BTreeMap::new()),
            Err(StoreError::Serialization(e)) => {
                tracing::error!(error = %e, "Corrupt learning progress file, ignoring it");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e),
        };

        let Value::Object(lessons) = root else {
            tracing::error!("Learning progress file is not an object, ignoring it");
            return Ok(BTreeMap::new());
        };

        Ok(lessons
            .into_iter()
            .map(|(key, lesson)| {
                let tests = match lesson.get("tests") {
                    Some(Value::Array(tests)) => decode_entries(&key, tests),
                    _ => Vec::new(),
                };
                (key, LessonProgress { tests })
            })
            .collect())
    }

    pub fn lesson_progress(&self, folder: &str, lesson: &str) -> StoreResult<LessonProgress> {
        let mut all = self.load_learning_progress()?;
        Ok(all
            .remove(&LessonProgress::key(folder, lesson))
            .unwrap_or_default())
    }

    /// Append an attempt to a lesson's history
    ///
    /// Works on the raw JSON so entries this version cannot decode are kept.
    /// A file that does not parse is left untouched and reported.
    pub fn append_test(&self, folder: &str, lesson: &str, attempt: TestAttempt) -> StoreResult<()> {
        let mut root = self
            .read_json(LEARNING_PROGRESS_FILE)?
            .unwrap_or_else(|| Value::Object(Map::new()));
        let Value::Object(lessons) = &mut root else {
            return Err(StoreError::Serialization(format!(
                "{} is not a JSON object",
                LEARNING_PROGRESS_FILE
            )));
        };

        let key = LessonProgress::key(folder, lesson);
        let tests = lessons
            .entry(key.clone())
            .or_insert_with(|| json!({ "tests": [] }))
            .as_object_mut()
            .map(|entry| entry.entry("tests").or_insert_with(|| Value::Array(Vec::new())))
            .and_then(Value::as_array_mut)
            .ok_or_else(|| StoreError::Serialization(format!("history of {} is not a list", key)))?;
        tests.push(serde_json::to_value(&attempt)?);

        let content = serde_json::to_string_pretty(&root)?;
        self.write_text("", LEARNING_PROGRESS_FILE, &content)?;
        tracing::info!(folder, lesson, "Test result saved");
        Ok(())
    }

    // ============================================
    // Wordbank and typos
    // ============================================

    pub fn wordbank(&self) -> StoreResult<Option<String>> {
        self.read_text(WORDBANK_FOLDER, WORDBANK_FILE)
    }

    pub fn saved_words(&self) -> StoreResult<Option<String>> {
        self.read_text(WORDBANK_FOLDER, SAVED_WORDS_FILE)
    }

    /// Append a word to the saved-words file
    pub fn save_word(&self, entry: &WordEntry) -> StoreResult<()> {
        let mut content = self.saved_words()?.unwrap_or_default();
        append_entry(&mut content, entry);
        self.write_text(WORDBANK_FOLDER, SAVED_WORDS_FILE, &content)?;
        tracing::info!(word = %entry.dutch, "Word saved");
        Ok(())
    }

    /// Logged typos; a corrupt file counts as empty
    pub fn load_typos(&self) -> StoreResult<Vec<TypoEntry>> {
        match self.read_json(TYPO_FILE) {
            Ok(Some(Value::Array(typos))) => Ok(decode_entries(TYPO_FILE, &typos)),
            Ok(Some(_)) => {
                tracing::error!("Typo file is not a list, ignoring it");
                Ok(Vec::new())
            }
            Ok(None) => Ok(Vec::new()),
            Err(StoreError::Serialization(e)) => {
                tracing::error!(error = %e, "Corrupt typo file, ignoring it");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Append a typo, keeping entries this version cannot decode
    pub fn append_typo(&self, typo: TypoEntry) -> StoreResult<()> {
        let mut root = self
            .read_json(TYPO_FILE)?
            .unwrap_or_else(|| Value::Array(Vec::new()));
        let Value::Array(typos) = &mut root else {
            return Err(StoreError::Serialization(format!("{} is not a JSON list", TYPO_FILE)));
        };
        typos.push(serde_json::to_value(&typo)?);

        let content = serde_json::to_string_pretty(&root)?;
        self.write_text("", TYPO_FILE, &content)?;
        Ok(())
    }

    /// Raw JSON of a file at the user root; missing or blank is `None`
    fn read_json(&self, file: &str) -> StoreResult<Option<Value>> {
        let Some(content) = self.read_text("", file)? else {
            return Ok(None);
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }
}

/// Decode what can be decoded, skipping the rest
fn decode_entries<T: DeserializeOwned>(source: &str, entries: &[Value]) -> Vec<T> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| match T::deserialize(entry) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(source, position, error = %e, "Skipping entry that does not decode");
                None
            }
        })
        .collect()
}

/// Reject names that are empty or could leave the directory
fn validate_name(name: &str) -> StoreResult<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
        || Path::new(name).is_absolute();

    if invalid {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
