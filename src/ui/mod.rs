pub mod layout;
mod check;
mod menu;
mod quiz;
mod summary;

pub use check::draw_inline_check;
pub use layout::{calculate_check_chunks, calculate_quiz_chunks, calculate_summary_chunks};
pub use menu::draw_menu;
pub use quiz::{draw_quit_confirmation, draw_quiz, option_lines, progress_spans};
pub use summary::{draw_summary, review_text, score_lines};
