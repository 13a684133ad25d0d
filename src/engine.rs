//! Quiz attempt state machine.
//!
//! A [`QuizEngine`] owns a validated [`QuestionSet`] and the [`AttemptState`]
//! of one learner working through it. The attempt is `InProgress` until
//! `next()` is called on the last answered question, or a timed exam runs
//! out via `time_up()`. It then moves to `Results` and stays there until
//! `restart()`.

use crate::error::{QuizError, Result};
use crate::models::QuestionRecord;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Non-empty, validated, immutable sequence of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<QuestionRecord>,
}

impl QuestionSet {
    /// Validates the records and freezes them for an attempt.
    ///
    /// Rejects an empty list, questions with fewer than two options, answer
    /// keys outside the option list and duplicate ids.
    pub fn new(questions: Vec<QuestionRecord>) -> Result<Self> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuestionSet);
        }

        let mut seen_ids = HashSet::new();
        for (i, question) in questions.iter().enumerate() {
            if question.options.len() < 2 {
                return Err(QuizError::TooFewOptions {
                    question: i,
                    count: question.options.len(),
                });
            }
            if question.correct_index >= question.options.len() {
                return Err(QuizError::CorrectIndexOutOfRange {
                    question: i,
                    index: question.correct_index,
                    options: question.options.len(),
                });
            }
            if let Some(id) = &question.id
                && !seen_ids.insert(id)
            {
                return Err(QuizError::DuplicateId { id: id.to_string() });
            }
        }

        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false` for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuestionRecord> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuestionRecord> {
        self.questions.iter()
    }

    pub fn as_slice(&self) -> &[QuestionRecord] {
        &self.questions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    InProgress,
    Results,
}

/// Mutable part of an attempt. Answers are keyed by question index and are
/// only ever added or overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptState {
    current_index: usize,
    selected_answers: BTreeMap<usize, usize>,
    mode: Mode,
    timed_out: bool,
}

impl AttemptState {
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn selected_answers(&self) -> &BTreeMap<usize, usize> {
        &self.selected_answers
    }

    pub fn selected(&self, question: usize) -> Option<usize> {
        self.selected_answers.get(&question).copied()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether `Results` was reached because the time limit ran out.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }
}

#[derive(Debug, Clone)]
pub struct QuizEngine {
    questions: QuestionSet,
    state: AttemptState,
}

impl QuizEngine {
    /// Begins a fresh attempt at question 0.
    pub fn start(questions: QuestionSet) -> Self {
        info!(questions = questions.len(), "Quiz attempt started");
        Self {
            questions,
            state: AttemptState::default(),
        }
    }

    /// Validates `records` and begins an attempt over them.
    pub fn from_records(records: Vec<QuestionRecord>) -> Result<Self> {
        Ok(Self::start(QuestionSet::new(records)?))
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn is_finished(&self) -> bool {
        self.state.mode == Mode::Results
    }

    pub fn current_question(&self) -> &QuestionRecord {
        // current_index is kept inside [0, len) and the set is never empty
        &self.questions.as_slice()[self.state.current_index]
    }

    pub fn selected_answer(&self, question: usize) -> Option<usize> {
        self.state.selected(question)
    }

    pub fn current_selection(&self) -> Option<usize> {
        self.state.selected(self.state.current_index)
    }

    pub fn is_answered(&self, question: usize) -> bool {
        self.state.selected_answers.contains_key(&question)
    }

    pub fn answered_count(&self) -> usize {
        self.state.selected_answers.len()
    }

    pub fn is_last(&self) -> bool {
        self.state.current_index + 1 == self.questions.len()
    }

    /// Whether `next()` would be accepted right now.
    pub fn can_advance(&self) -> bool {
        self.state.mode == Mode::InProgress && self.is_answered(self.state.current_index)
    }

    pub fn first_unanswered(&self) -> Option<usize> {
        (0..self.questions.len()).find(|i| !self.is_answered(*i))
    }

    /// Records `option` as the answer to the current question, replacing any
    /// earlier choice. Does not advance.
    pub fn select_answer(&mut self, option: usize) -> Result<()> {
        self.ensure_in_progress()?;
        let options = self.current_question().options.len();
        if option >= options {
            debug!(option, options, "Rejected out-of-range option");
            return Err(QuizError::OptionOutOfRange {
                index: option,
                options,
            });
        }

        self.state
            .selected_answers
            .insert(self.state.current_index, option);
        debug!(
            question = self.state.current_index,
            option, "Answer recorded"
        );
        Ok(())
    }

    /// Moves to the following question, or into `Results` from the last one.
    /// Refused while the current question is unanswered.
    pub fn next(&mut self) -> Result<Mode> {
        self.ensure_in_progress()?;
        let index = self.state.current_index;
        if !self.is_answered(index) {
            debug!(question = index, "Refused to advance past unanswered question");
            return Err(QuizError::NotAnswered { index });
        }

        if self.is_last() {
            self.finish();
        } else {
            self.state.current_index += 1;
        }
        Ok(self.state.mode)
    }

    /// Ends a timed attempt where it stands. Unanswered questions stay
    /// unanswered and score as wrong.
    pub fn time_up(&mut self) -> Result<()> {
        self.ensure_in_progress()?;
        self.state.timed_out = true;
        info!(
            answered = self.answered_count(),
            "Time limit reached"
        );
        self.finish();
        Ok(())
    }

    /// Steps back one question. Recorded answers are kept.
    pub fn previous(&mut self) -> Result<()> {
        self.ensure_in_progress()?;
        if self.state.current_index == 0 {
            return Err(QuizError::AtFirstQuestion);
        }
        self.state.current_index -= 1;
        Ok(())
    }

    /// Goes straight to `index`, answered or not.
    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        self.ensure_in_progress()?;
        let count = self.questions.len();
        if index >= count {
            return Err(QuizError::IndexOutOfRange { index, count });
        }
        self.state.current_index = index;
        Ok(())
    }

    /// Number of questions whose recorded answer matches the key. Unanswered
    /// questions count as wrong.
    pub fn score(&self) -> usize {
        self.questions
            .iter()
            .enumerate()
            .filter(|(i, q)| self.state.selected(*i) == Some(q.correct_index))
            .count()
    }

    /// Discards the attempt and begins again at question 0.
    pub fn restart(&mut self) {
        info!(previous_score = self.score(), "Quiz attempt restarted");
        self.state = AttemptState::default();
    }

    fn finish(&mut self) {
        self.state.mode = Mode::Results;
        info!(
            score = self.score(),
            total = self.questions.len(),
            "Quiz attempt finished"
        );
    }

    fn ensure_in_progress(&self) -> Result<()> {
        match self.state.mode {
            Mode::InProgress => Ok(()),
            Mode::Results => Err(QuizError::AttemptFinished),
        }
    }
}
