//! Error types for question loading and quiz operations.
//!
//! Every engine operation that can be refused returns one of these and leaves
//! the attempt untouched.

use thiserror::Error;

/// Errors raised while loading a question set or driving an attempt.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A question set must contain at least one question.
    #[error("question set is empty")]
    EmptyQuestionSet,

    /// A question offers fewer than two options.
    #[error("question {question} has {count} option(s), at least 2 are required")]
    TooFewOptions { question: usize, count: usize },

    /// The answer key points outside the option list.
    #[error("question {question}: correct index {index} is out of range for {options} options")]
    CorrectIndexOutOfRange {
        question: usize,
        index: usize,
        options: usize,
    },

    /// A textual answer key matched none of the options.
    #[error("question {question}: correct answer {answer:?} matches no option")]
    UnknownCorrectAnswer { question: usize, answer: String },

    /// Two questions share the same id.
    #[error("duplicate question id {id}")]
    DuplicateId { id: String },

    /// The chosen option does not exist on the current question.
    #[error("option {index} is out of range for {options} options")]
    OptionOutOfRange { index: usize, options: usize },

    /// Advancing requires an answer for the current question.
    #[error("question {index} has not been answered")]
    NotAnswered { index: usize },

    /// The attempt is showing results; only a restart is accepted.
    #[error("attempt is finished, restart to try again")]
    AttemptFinished,

    /// There is no question before the first one.
    #[error("already at the first question")]
    AtFirstQuestion,

    /// A jump target outside the question set.
    #[error("question index {index} is out of range for {count} questions")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A CSV line could not be turned into a question.
    #[error("line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("unsupported question file format: {0}")]
    UnsupportedFormat(String),
}

impl QuizError {
    /// Returns `true` for errors caused by malformed question data rather than
    /// by an operation attempted at the wrong time.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            QuizError::EmptyQuestionSet
                | QuizError::TooFewOptions { .. }
                | QuizError::CorrectIndexOutOfRange { .. }
                | QuizError::UnknownCorrectAnswer { .. }
                | QuizError::DuplicateId { .. }
                | QuizError::Json(_)
                | QuizError::Toml(_)
                | QuizError::Csv { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = QuizError::CorrectIndexOutOfRange {
            question: 2,
            index: 4,
            options: 4,
        };
        assert_eq!(
            err.to_string(),
            "question 2: correct index 4 is out of range for 4 options"
        );
        assert_eq!(
            QuizError::NotAnswered { index: 0 }.to_string(),
            "question 0 has not been answered"
        );
    }

    #[test]
    fn test_data_error_classification() {
        assert!(QuizError::EmptyQuestionSet.is_data_error());
        assert!(QuizError::Csv {
            line: 3,
            message: "missing options".to_string()
        }
        .is_data_error());
        assert!(!QuizError::AttemptFinished.is_data_error());
        assert!(!QuizError::NotAnswered { index: 1 }.is_data_error());
    }
}
