//! Practice sessions
//!
//! A [`PracticeSession`] holds one lesson's sentences and progress record.
//! Every mutation updates the record and pushes it whole to the backend
//! right away; there is no local queue. When a save fails the record keeps
//! the change and the error is returned for display.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::Arc;

use crate::assessment::{score_locally, GeneratedTest, LessonProgress, TestAttempt, TestQuestion};
use crate::client::backend::PracticeBackend;
use crate::client::http::{ClientError, ClientResult};
use crate::practice::cloze::{create_blanks, BlankedSentence};
use crate::practice::progress::AnswerProgress;
use crate::practice::spaced::{due_sentences, is_due_for_review, review_checked};
use crate::practice::table::estimate_level;
use crate::practice::{
    DifficultyLevel, MasterySummary, PracticeError, PracticeMode, ProgressRecord, Rating,
    SentencePair, StudyStats, DEFAULT_MASTERY_THRESHOLD,
};

/// Result of a reverse-quiz answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseCheck {
    pub correct: bool,
    /// Target-language sentence that was expected
    pub expected: String,
    /// Counter state after a correct answer
    pub progress: Option<AnswerProgress>,
}

/// One lesson opened for practice
pub struct PracticeSession {
    backend: Arc<dyn PracticeBackend>,
    folder: String,
    filename: String,
    sentences: Vec<SentencePair>,
    keywords: Vec<String>,
    record: ProgressRecord,
    stats: StudyStats,
    mastery_threshold: u32,
}

impl PracticeSession {
    /// Load the lesson text and its progress
    ///
    /// A progress load failure starts from an empty record.
    pub async fn load(
        backend: Arc<dyn PracticeBackend>,
        folder: impl Into<String>,
        filename: impl Into<String>,
        now: DateTime<Utc>,
    ) -> ClientResult<Self> {
        let folder = folder.into();
        let filename = filename.into();
        if folder.is_empty() {
            return Err(ClientError::MissingFolder);
        }

        let text = backend.load_text(&folder, &filename).await?;

        let record = match backend.load_progress(&folder, &filename).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(folder, filename, error = %e, "Could not load progress, starting fresh");
                ProgressRecord::new()
            }
        };

        if let Some(max) = record.max_index() {
            if max >= text.sentences.len() {
                tracing::warn!(
                    folder,
                    filename,
                    max_index = max,
                    sentences = text.sentences.len(),
                    "Progress refers to sentences past the end of the lesson"
                );
            }
        }

        tracing::info!(folder, filename, sentences = text.sentences.len(), "Practice session loaded");

        Ok(Self {
            backend,
            folder,
            filename,
            sentences: text.sentences,
            keywords: text.keywords,
            record,
            stats: StudyStats::new(now),
            mastery_threshold: DEFAULT_MASTERY_THRESHOLD,
        })
    }

    /// Correct reverse answers needed for mastery
    pub fn with_mastery_threshold(mut self, threshold: u32) -> Self {
        self.mastery_threshold = threshold.max(1);
        self
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn sentences(&self) -> &[SentencePair] {
        &self.sentences
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    pub fn stats(&self) -> &StudyStats {
        &self.stats
    }

    pub fn reset_stats(&mut self, now: DateTime<Utc>) {
        self.stats.reset(now);
    }

    pub fn summary(&self) -> MasterySummary {
        self.record.summary(self.sentences.len())
    }

    pub fn level(&self) -> Option<DifficultyLevel> {
        estimate_level(&self.sentences)
    }

    /// Indices for the spaced-repetition queue
    pub fn review_queue(&self, now: DateTime<Utc>) -> Vec<usize> {
        due_sentences(&self.record, self.sentences.len(), now)
    }

    pub fn is_due(&self, index: usize, now: DateTime<Utc>) -> bool {
        is_due_for_review(
            self.record.last_review(index),
            self.record.spaced_level(index),
            now,
        )
    }

    fn sentence(&self, index: usize) -> ClientResult<&SentencePair> {
        self.sentences.get(index).ok_or_else(|| {
            PracticeError::IndexOutOfRange {
                index,
                len: self.sentences.len(),
            }
            .into()
        })
    }

    /// Set a mastery flag
    ///
    /// Returns false without saving when the flag was already set.
    pub async fn mark_mastered(&mut self, mode: PracticeMode, index: usize) -> ClientResult<bool> {
        self.sentence(index)?;
        if !self.record.mark_mastered(mode, index) {
            return Ok(false);
        }

        tracing::debug!(index, mode = %mode, "Marked mastered");
        self.save().await?;
        Ok(true)
    }

    /// Check a typed target-language sentence in the reverse quiz
    ///
    /// Comparison ignores case and surrounding whitespace. Only a correct
    /// answer touches the record.
    pub async fn check_reverse_answer(&mut self, index: usize, answer: &str) -> ClientResult<ReverseCheck> {
        let expected = self.sentence(index)?.target_lang.clone();
        let correct = answer.trim().to_lowercase() == expected.to_lowercase();
        self.stats.record(correct);

        if !correct {
            return Ok(ReverseCheck {
                correct,
                expected,
                progress: None,
            });
        }

        let progress = self
            .record
            .record_correct_answer(index, self.mastery_threshold);
        if progress.newly_mastered {
            tracing::info!(index, count = progress.count, "Sentence mastered in reverse mode");
        }
        self.save().await?;

        Ok(ReverseCheck {
            correct,
            expected,
            progress: Some(progress),
        })
    }

    /// Hide one or two words of a sentence for the blank exercise
    pub fn blank_sentence<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> ClientResult<BlankedSentence> {
        Ok(create_blanks(&self.sentence(index)?.target_lang, rng))
    }

    /// Check the words typed into a blanked sentence
    ///
    /// Counts toward the study statistics. Mastery stays a separate,
    /// explicit [`mark_mastered`](Self::mark_mastered).
    pub fn check_blanks(&mut self, blanked: &BlankedSentence, answer: &str) -> bool {
        let correct = blanked.check(answer);
        self.stats.record(correct);
        correct
    }

    /// Rate a spaced-repetition review and return the new level
    pub async fn rate(&mut self, index: usize, rating: Rating, now: DateTime<Utc>) -> ClientResult<u32> {
        let level = review_checked(&mut self.record, index, self.sentences.len(), rating, now)?;
        self.stats.record(rating.counts_as_correct());

        tracing::info!(index, level, rating = %rating, "Sentence reviewed");
        self.save().await?;
        Ok(level)
    }

    /// Clear all progress of the lesson
    pub async fn reset(&mut self) -> ClientResult<()> {
        self.record.reset();
        self.backend
            .reset_progress(&self.folder, &self.filename)
            .await?;
        tracing::info!(folder = %self.folder, filename = %self.filename, "Progress reset");
        Ok(())
    }

    async fn save(&self) -> ClientResult<()> {
        self.backend
            .save_progress(&self.folder, &self.filename, &self.record)
            .await
            .map_err(|e| {
                tracing::error!(folder = %self.folder, filename = %self.filename, error = %e, "Error saving progress");
                e
            })
    }

    /// Tests for this lesson
    pub fn tests(&self) -> LessonTests {
        LessonTests::new(Arc::clone(&self.backend), &self.folder, &self.filename)
    }

    /// Score and store a test taken on this lesson
    pub async fn submit_test(
        &self,
        questions: &[TestQuestion],
        answers: &[String],
        max_points: u32,
        now: DateTime<Utc>,
    ) -> ClientResult<TestSubmission> {
        self.tests().submit(questions, answers, max_points, now).await
    }
}

/// Outcome of submitting a test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSubmission {
    pub attempt: TestAttempt,
    /// The backend could not score the attempt; it was scored exact-match only
    pub used_local_fallback: bool,
    /// The attempt reached the lesson history
    pub saved: bool,
}

/// Test operations on one lesson
pub struct LessonTests {
    backend: Arc<dyn PracticeBackend>,
    folder: String,
    lesson: String,
}

impl LessonTests {
    pub fn new(backend: Arc<dyn PracticeBackend>, folder: &str, lesson: &str) -> Self {
        Self {
            backend,
            folder: folder.to_string(),
            lesson: lesson.to_string(),
        }
    }

    pub async fn generate(&self) -> ClientResult<GeneratedTest> {
        self.backend.generate_test(&self.folder, &self.lesson).await
    }

    pub async fn history(&self) -> ClientResult<LessonProgress> {
        self.backend.lesson_progress(&self.folder, &self.lesson).await
    }

    /// Score the answers and append the attempt to the history
    ///
    /// Backend scoring is preferred; when it fails the attempt is scored
    /// locally. A failed save is logged and reported through
    /// [`TestSubmission::saved`].
    pub async fn submit(
        &self,
        questions: &[TestQuestion],
        answers: &[String],
        max_points: u32,
        now: DateTime<Utc>,
    ) -> ClientResult<TestSubmission> {
        if self.folder.is_empty() {
            return Err(ClientError::MissingFolder);
        }

        let draft = TestAttempt::new(questions, answers, max_points, now);

        let (attempt, used_local_fallback) =
            match self.backend.evaluate_test(&self.folder, &self.lesson, &draft).await {
                Ok(scored) => (scored, false),
                Err(e) => {
                    tracing::warn!(lesson = %self.lesson, error = %e, "Evaluation failed, scoring locally");
                    let mut local = draft;
                    score_locally(&mut local);
                    (local, true)
                }
            };

        let saved = match self.backend.save_test(&self.folder, &self.lesson, &attempt).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(lesson = %self.lesson, error = %e, "Error saving test result");
                false
            }
        };

        tracing::info!(
            folder = %self.folder,
            lesson = %self.lesson,
            score = attempt.score,
            used_local_fallback,
            "Test submitted"
        );

        Ok(TestSubmission {
            attempt,
            used_local_fallback,
            saved,
        })
    }
}
