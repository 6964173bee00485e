//! In-memory backend for session tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::dto::LoadTextResponse;
use crate::assessment::{evaluate_attempt, GeneratedTest, LessonProgress, TestAttempt};
use crate::client::backend::PracticeBackend;
use crate::client::http::{ClientError, ClientResult};
use crate::practice::table::{extract_keywords, parse_sentence_table};
use crate::practice::{Difficulty, ProgressRecord, TypoEntry, WordEntry};

#[derive(Default)]
pub(crate) struct MemoryBackend {
    lessons: HashMap<String, String>,
    wordbank: Option<String>,
    progress: Mutex<HashMap<String, ProgressRecord>>,
    saved_words: Mutex<Vec<WordEntry>>,
    typos: Mutex<Vec<TypoEntry>>,
    tests: Mutex<Vec<TestAttempt>>,
    saves: Mutex<usize>,
    fail_saves: bool,
    fail_evaluate: bool,
    fail_progress_load: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lesson(mut self, filename: &str, content: &str) -> Self {
        self.lessons.insert(filename.to_string(), content.to_string());
        self
    }

    pub fn with_wordbank(mut self, content: &str) -> Self {
        self.wordbank = Some(content.to_string());
        self
    }

    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn failing_evaluate(mut self) -> Self {
        self.fail_evaluate = true;
        self
    }

    pub fn failing_progress_load(mut self) -> Self {
        self.fail_progress_load = true;
        self
    }

    pub fn stored_progress(&self, filename: &str) -> Option<ProgressRecord> {
        self.progress.lock().unwrap().get(filename).cloned()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    pub fn stored_words(&self) -> Vec<WordEntry> {
        self.saved_words.lock().unwrap().clone()
    }

    pub fn stored_typos(&self) -> Vec<TypoEntry> {
        self.typos.lock().unwrap().clone()
    }

    pub fn stored_tests(&self) -> Vec<TestAttempt> {
        self.tests.lock().unwrap().clone()
    }

    fn check_save(&self) -> ClientResult<()> {
        if self.fail_saves {
            return Err(ClientError::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl PracticeBackend for MemoryBackend {
    async fn load_text(&self, _folder: &str, filename: &str) -> ClientResult<LoadTextResponse> {
        let content = self.lessons.get(filename).cloned().ok_or(ClientError::Api {
            status: 404,
            message: format!("File '{}' not found", filename),
        })?;
        let sentences = parse_sentence_table(&content);
        let target_text = sentences
            .iter()
            .map(|s| s.target_lang.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(LoadTextResponse {
            keywords: extract_keywords(&target_text),
            sentences,
            content,
        })
    }

    async fn load_progress(&self, _folder: &str, filename: &str) -> ClientResult<ProgressRecord> {
        if self.fail_progress_load {
            return Err(ClientError::Timeout);
        }
        Ok(self.stored_progress(filename).unwrap_or_default())
    }

    async fn save_progress(
        &self,
        _folder: &str,
        filename: &str,
        record: &ProgressRecord,
    ) -> ClientResult<()> {
        self.check_save()?;
        self.progress
            .lock()
            .unwrap()
            .insert(filename.to_string(), record.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    async fn reset_progress(&self, _folder: &str, filename: &str) -> ClientResult<()> {
        self.check_save()?;
        self.progress
            .lock()
            .unwrap()
            .insert(filename.to_string(), ProgressRecord::new());
        Ok(())
    }

    async fn wordbank(&self) -> ClientResult<String> {
        self.wordbank.clone().ok_or(ClientError::Api {
            status: 404,
            message: "Wordbank file not found".to_string(),
        })
    }

    async fn typo_words(&self) -> ClientResult<Vec<WordEntry>> {
        Ok(self
            .stored_typos()
            .into_iter()
            .map(|t| WordEntry::new(t.correct_answer, t.english, Difficulty::Hard))
            .collect())
    }

    async fn save_word(&self, entry: &WordEntry) -> ClientResult<()> {
        self.check_save()?;
        self.saved_words.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn save_typo(&self, typo: &TypoEntry) -> ClientResult<()> {
        self.check_save()?;
        self.typos.lock().unwrap().push(typo.clone());
        Ok(())
    }

    async fn generate_test(&self, _folder: &str, _lesson: &str) -> ClientResult<GeneratedTest> {
        Ok(GeneratedTest::default())
    }

    async fn evaluate_test(
        &self,
        _folder: &str,
        _lesson: &str,
        attempt: &TestAttempt,
    ) -> ClientResult<TestAttempt> {
        if self.fail_evaluate {
            return Err(ClientError::Api {
                status: 500,
                message: "Internal error".to_string(),
            });
        }
        let mut scored = attempt.clone();
        evaluate_attempt(&mut scored);
        Ok(scored)
    }

    async fn save_test(&self, _folder: &str, _lesson: &str, attempt: &TestAttempt) -> ClientResult<()> {
        self.check_save()?;
        self.tests.lock().unwrap().push(attempt.clone());
        Ok(())
    }

    async fn lesson_progress(&self, _folder: &str, _lesson: &str) -> ClientResult<LessonProgress> {
        Ok(LessonProgress {
            tests: self.stored_tests(),
        })
    }
}
