pub mod bank;
pub mod config;
pub mod csv;
pub mod engine;
pub mod error;
pub mod inline_check;
pub mod logger;
pub mod models;
pub mod scoring;
pub mod session;
pub mod ui;
pub mod utils;


// Re-exports for convenience
pub use bank::{get_quiz_files, load_question_file, sample_questions, ExamSettings, LoadedQuiz};
pub use config::{load_config, load_config_with, AppConfig, ConfigIssue, LoadedConfig};
pub use engine::{AttemptState, Mode, QuestionSet, QuizEngine};
pub use error::QuizError;
pub use inline_check::{CheckFeedback, InlineCheck};
pub use models::{AppState, CheckSession, QuestionId, QuestionRecord, QuizSession};
pub use scoring::{Grade, GradeBands, ScoreReport};
pub use session::{
    handle_check_input, handle_quit_confirm_input, handle_quiz_input, handle_summary_input,
    start_check, start_session, tick_quiz,
};
pub use ui::{draw_inline_check, draw_menu, draw_quit_confirmation, draw_quiz, draw_summary};
