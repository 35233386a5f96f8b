//! Timed trivia rounds.
//!
//! A game is [`LEVELS_TOTAL`] levels of [`QUESTIONS_PER_LEVEL`] questions, each
//! level on a shared [`ROUND_TIME_SEC`] clock driven by [`QuizSession::tick`].
//! Randomness is always passed in, so tests can use a seeded generator.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::question_bank::{Question, QUESTION_BANK};
use crate::stats::ActivityEvent;

pub const LEVELS_TOTAL: u32 = 10;
pub const QUESTIONS_PER_LEVEL: usize = 10;
pub const ROUND_TIME_SEC: u32 = 30;

/// Returns a uniformly permuted copy of `items`.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    copy.shuffle(rng);
    copy
}

/// Picks `count` random questions (fewer if the bank is smaller) in random order.
pub fn build_level_questions<T: Clone, R: Rng + ?Sized>(bank: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut picked = shuffle(bank, rng);
    picked.truncate(count);
    shuffle(&picked, rng)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    NotStarted,
    InProgress,
    LevelComplete,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_index: usize,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    bank: Vec<Question>,
    level: u32,
    questions: Vec<Question>,
    index: usize,
    score: u32,
    time_left: u32,
    paused: bool,
    phase: QuizPhase,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new(&QUESTION_BANK)
    }
}

impl QuizSession {
    pub fn new(bank: &[Question]) -> Self {
        Self {
            bank: bank.to_vec(),
            level: 1,
            questions: Vec::new(),
            index: 0,
            score: 0,
            time_left: ROUND_TIME_SEC,
            paused: false,
            phase: QuizPhase::NotStarted,
        }
    }

    /// Starts (or restarts) the game at level 1.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.begin_level(1, rng);
    }

    /// Moves on after a completed level. `false` if there is nothing to advance to.
    pub fn next_level<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.phase != QuizPhase::LevelComplete {
            return false;
        }
        self.begin_level(self.level + 1, rng);
        true
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::InProgress => self.questions.get(self.index),
            _ => None,
        }
    }

    /// Scores `option` against the current question and advances.
    ///
    /// Ignored (returns `None`) while paused or outside a running round.
    pub fn answer(&mut self, option: usize) -> Option<AnswerOutcome> {
        if self.paused {
            return None;
        }
        let question = *self.current_question()?;

        let correct = option == question.correct_index;
        if correct {
            self.score += 1;
        }

        self.index += 1;
        if self.index >= self.questions.len() {
            self.end_round();
        }

        Some(AnswerOutcome {
            correct,
            correct_index: question.correct_index,
        })
    }

    /// One second of round time. Running out ends the round.
    pub fn tick(&mut self) {
        if self.paused || self.phase != QuizPhase::InProgress {
            return;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            debug!("Level {} timed out at question {}", self.level, self.index + 1);
            self.end_round();
        }
    }

    pub fn pause(&mut self) {
        if self.phase == QuizPhase::InProgress {
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// The event to record once a round is over; unanswered questions count
    /// against the score.
    pub fn result_event(&self) -> Option<ActivityEvent> {
        match self.phase {
            QuizPhase::LevelComplete | QuizPhase::Finished => Some(ActivityEvent::QuizFinished {
                score: self.score,
                total: self.questions.len() as u32,
            }),
            _ => None,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// "Level 3 • Q 4/10"
    pub fn progress_label(&self) -> String {
        format!(
            "Level {} • Q {}/{}",
            self.level,
            (self.index + 1).min(QUESTIONS_PER_LEVEL),
            QUESTIONS_PER_LEVEL
        )
    }

    fn begin_level<R: Rng + ?Sized>(&mut self, level: u32, rng: &mut R) {
        self.level = level;
        self.questions = build_level_questions(&self.bank, QUESTIONS_PER_LEVEL, rng);
        self.index = 0;
        self.score = 0;
        self.time_left = ROUND_TIME_SEC;
        self.paused = false;
        self.phase = if self.questions.is_empty() {
            QuizPhase::Finished
        } else {
            QuizPhase::InProgress
        };
    }

    fn end_round(&mut self) {
        self.phase = if self.level < LEVELS_TOTAL {
            QuizPhase::LevelComplete
        } else {
            QuizPhase::Finished
        };
    }
}
