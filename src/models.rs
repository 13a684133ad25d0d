use crate::engine::QuizEngine;
use crate::inline_check::InlineCheck;
use crate::scoring::GradeBands;
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::fmt;

/// Identifier of a question inside its set. Authored content uses both
/// numeric and string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

/// One multiple-choice question. Option order defines the answer index space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: Option<QuestionId>,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
    pub topic: Option<String>,
    /// Coarser grouping than `topic`, used to balance sampled exams.
    pub category: Option<String>,
}

impl QuestionRecord {
    pub fn new(prompt: impl Into<String>, options: Vec<String>, correct_index: usize) -> Self {
        Self {
            id: None,
            prompt: prompt.into(),
            options,
            correct_index,
            explanation: String::new(),
            topic: None,
            category: None,
        }
    }

    pub fn with_id(mut self, id: QuestionId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Label used for balancing and the per-group breakdown: the category
    /// when present, otherwise the topic.
    pub fn group(&self) -> Option<&str> {
        self.category.as_deref().or(self.topic.as_deref())
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

/// A running quiz together with what the terminal view needs around it.
#[derive(Debug)]
pub struct QuizSession {
    pub engine: QuizEngine,
    pub deck_name: String,
    pub bands: GradeBands,
    /// Option under the cursor; distinct from the recorded selection.
    pub highlighted: usize,
    pub review_scroll_y: u16,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub time_limit: Option<chrono::Duration>,
}

impl QuizSession {
    pub fn new(engine: QuizEngine, deck_name: impl Into<String>, bands: GradeBands) -> Self {
        Self {
            engine,
            deck_name: deck_name.into(),
            bands,
            highlighted: 0,
            review_scroll_y: 0,
            started_at: Local::now(),
            finished_at: None,
            time_limit: None,
        }
    }

    pub fn with_time_limit(mut self, limit: Option<chrono::Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Moves the cursor onto the recorded answer of the current question, or
    /// the first option when it is unanswered.
    pub fn sync_highlight(&mut self) {
        self.highlighted = self.engine.current_selection().unwrap_or(0);
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Local::now) - self.started_at
    }

    /// Time left at `now`, never negative. `None` for untimed quizzes.
    pub fn remaining_at(&self, now: DateTime<Local>) -> Option<chrono::Duration> {
        self.time_limit
            .map(|limit| (limit - (now - self.started_at)).max(chrono::Duration::zero()))
    }
}

/// Single-question check launched from the menu.
#[derive(Debug)]
pub struct CheckSession {
    pub check: InlineCheck,
    pub deck_name: String,
    pub highlighted: usize,
}

impl CheckSession {
    pub fn new(check: InlineCheck, deck_name: impl Into<String>) -> Self {
        Self {
            check,
            deck_name: deck_name.into(),
            highlighted: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Quiz,
    QuizQuitConfirm,
    Summary,
    Check,
}
