//! Vocabulary typing practice
//!
//! The learner sees the translation and types the target-language word.
//! Wrong attempts are queued as typos, at most once per distinct
//! `(answer, correct)` pair per session, and can later be practiced again
//! in personalized mode.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::practice::error::{PracticeError, PracticeResult};
use crate::practice::types::{TypoEntry, WordEntry};

/// Live feedback while typing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCheck {
    /// Nothing typed yet
    Empty,
    /// Not correct yet but not wrong either
    Pending,
    Correct,
    /// More characters than the answer has
    TooLong,
}

/// Result of pressing Enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Correct,
    Incorrect,
    Empty,
    /// Moved on to the next word
    Advanced,
    /// Moved past the last word
    Finished,
}

#[derive(Debug, Clone)]
pub struct VocabSession {
    original: Vec<WordEntry>,
    words: Vec<WordEntry>,
    personalized: bool,
    index: usize,
    last_completed: usize,
    normal_resume: usize,
    revealed: bool,
    answered_correctly: bool,
    saved_keys: HashSet<String>,
    pending_typos: Vec<TypoEntry>,
}

impl VocabSession {
    pub fn new(words: Vec<WordEntry>) -> PracticeResult<Self> {
        if words.is_empty() {
            return Err(PracticeError::EmptyWordList);
        }
        Ok(Self {
            words: words.clone(),
            original: words,
            personalized: false,
            index: 0,
            last_completed: 0,
            normal_resume: 0,
            revealed: false,
            answered_correctly: false,
            saved_keys: HashSet::new(),
            pending_typos: Vec::new(),
        })
    }

    /// Resume at a previously completed position
    pub fn resume_at(mut self, index: usize) -> Self {
        self.index = index.min(self.words.len());
        self.last_completed = self.index;
        self
    }

    /// Word being practiced, `None` once the list is done
    pub fn current(&self) -> Option<&WordEntry> {
        self.words.get(self.index)
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.words.len()
    }

    pub fn is_personalized(&self) -> bool {
        self.personalized
    }

    /// Index to resume from later
    pub fn last_completed(&self) -> usize {
        self.last_completed
    }

    /// `(index, len)` of the active list
    pub fn progress(&self) -> (usize, usize) {
        (self.index, self.words.len())
    }

    fn current_or_finished(&self) -> PracticeResult<&WordEntry> {
        self.words.get(self.index).ok_or(PracticeError::SessionFinished)
    }

    /// Check the text typed so far
    pub fn on_input(&mut self, text: &str, now: DateTime<Utc>) -> PracticeResult<InputCheck> {
        let word = self.current_or_finished()?.clone();
        let answer = text.trim();

        if answer.is_empty() {
            return Ok(InputCheck::Empty);
        }

        if answer.to_lowercase() == word.dutch.to_lowercase() {
            self.answered_correctly = true;
            self.last_completed = self.index + 1;
            return Ok(InputCheck::Correct);
        }

        if answer.chars().count() > word.dutch.chars().count() {
            self.record_typo(answer, &word, now);
            return Ok(InputCheck::TooLong);
        }

        Ok(InputCheck::Pending)
    }

    /// Handle Enter
    ///
    /// After a correct answer or a reveal, Enter moves on. Otherwise the
    /// answer is checked and a wrong one is recorded as a typo.
    pub fn submit(&mut self, text: &str, now: DateTime<Utc>) -> PracticeResult<SubmitOutcome> {
        let word = self.current_or_finished()?.clone();

        if self.answered_correctly || self.revealed {
            return self.next();
        }

        let answer = text.trim();
        if answer.is_empty() {
            return Ok(SubmitOutcome::Empty);
        }

        if answer.to_lowercase() == word.dutch.to_lowercase() {
            self.answered_correctly = true;
            self.last_completed = self.index + 1;
            return Ok(SubmitOutcome::Correct);
        }

        self.record_typo(answer, &word, now);
        Ok(SubmitOutcome::Incorrect)
    }

    /// Show the answer; Enter then moves on
    pub fn reveal(&mut self) -> PracticeResult<&WordEntry> {
        if self.is_finished() {
            return Err(PracticeError::SessionFinished);
        }
        self.revealed = true;
        self.current_or_finished()
    }

    /// Move to the next word
    pub fn next(&mut self) -> PracticeResult<SubmitOutcome> {
        if self.is_finished() {
            return Err(PracticeError::SessionFinished);
        }

        self.index += 1;
        self.last_completed = self.index;
        self.revealed = false;
        self.answered_correctly = false;

        if self.is_finished() {
            tracing::debug!(words = self.words.len(), personalized = self.personalized, "Vocabulary list finished");
            Ok(SubmitOutcome::Finished)
        } else {
            Ok(SubmitOutcome::Advanced)
        }
    }

    /// Start the active list from the beginning
    pub fn restart(&mut self) {
        self.index = 0;
        self.last_completed = 0;
        self.revealed = false;
        self.answered_correctly = false;
    }

    /// Practice the typo words instead of the wordbank
    ///
    /// The wordbank position is remembered and restored on leaving.
    pub fn enter_personalized(&mut self, typo_words: Vec<WordEntry>) -> PracticeResult<()> {
        if typo_words.is_empty() {
            return Err(PracticeError::EmptyWordList);
        }

        if !self.personalized {
            self.normal_resume = self.last_completed;
        }
        self.words = typo_words;
        self.personalized = true;
        self.restart();

        tracing::info!(words = self.words.len(), "Switched to personalized practice");
        Ok(())
    }

    /// Return to the wordbank at the remembered position
    pub fn leave_personalized(&mut self) {
        if !self.personalized {
            return;
        }

        self.words = self.original.clone();
        self.personalized = false;
        self.index = self.normal_resume.min(self.words.len());
        self.last_completed = self.index;
        self.revealed = false;
        self.answered_correctly = false;

        tracing::info!(index = self.index, "Switched to normal practice");
    }

    /// Drain the typos waiting to be saved
    pub fn take_pending_typos(&mut self) -> Vec<TypoEntry> {
        std::mem::take(&mut self.pending_typos)
    }

    fn record_typo(&mut self, answer: &str, word: &WordEntry, now: DateTime<Utc>) {
        let typo = TypoEntry {
            user_answer: answer.to_string(),
            correct_answer: word.dutch.clone(),
            english: word.english.clone(),
            timestamp: now,
        };

        if self.saved_keys.insert(typo.key()) {
            self.pending_typos.push(typo);
        }
    }
}
