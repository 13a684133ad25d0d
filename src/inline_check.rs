//! Single-question knowledge check with immediate feedback.
//!
//! This is the quiz engine collapsed to one question: selecting an option
//! records it and moves straight to results, so there is no separate
//! "next" step and nothing to navigate.

use crate::engine::{Mode, QuestionSet, QuizEngine};
use crate::error::Result;
use crate::models::QuestionRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFeedback {
    pub selected: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone)]
pub struct InlineCheck {
    engine: QuizEngine,
}

impl InlineCheck {
    pub fn new(question: QuestionRecord) -> Result<Self> {
        let questions = QuestionSet::new(vec![question])?;
        Ok(Self {
            engine: QuizEngine::start(questions),
        })
    }

    pub fn question(&self) -> &QuestionRecord {
        self.engine.current_question()
    }

    pub fn selected(&self) -> Option<usize> {
        self.engine.current_selection()
    }

    pub fn is_revealed(&self) -> bool {
        self.engine.mode() == Mode::Results
    }

    /// Records the answer and reveals the feedback in one step. Rejected once
    /// feedback is showing; call [`InlineCheck::reset`] to try again.
    pub fn select_answer(&mut self, option: usize) -> Result<CheckFeedback> {
        self.engine.select_answer(option)?;
        self.engine.next()?;
        Ok(self.build_feedback(option))
    }

    pub fn feedback(&self) -> Option<CheckFeedback> {
        if !self.is_revealed() {
            return None;
        }
        self.selected().map(|option| self.build_feedback(option))
    }

    pub fn reset(&mut self) {
        self.engine.restart();
    }

    fn build_feedback(&self, selected: usize) -> CheckFeedback {
        let question = self.question();
        CheckFeedback {
            selected,
            correct_index: question.correct_index,
            is_correct: question.is_correct(selected),
            explanation: question.explanation.clone(),
        }
    }
}
