use crate::bank::{load_question_file, prepare_question_set};
use crate::config::AppConfig;
use crate::engine::{Mode, QuizEngine};
use crate::error::{QuizError, Result};
use crate::inline_check::InlineCheck;
use crate::models::{AppState, CheckSession, QuizSession};
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use rand::Rng;
use std::path::Path;
use tracing::{debug, info};

/// Loads `path` and begins a full quiz over it.
pub fn start_session<R: Rng + ?Sized>(
    path: &Path,
    config: &AppConfig,
    rng: &mut R,
) -> Result<QuizSession> {
    let loaded = load_question_file(path)?;
    let name = loaded.name.clone();
    let bands = loaded.settings.bands(config.bands());
    let time_limit = loaded.settings.time_limit();
    let questions = prepare_question_set(loaded, config, rng)?;
    info!(
        quiz = %name,
        questions = questions.len(),
        pass_mark = bands.pass_mark,
        time_limit_secs = time_limit.map(|t| t.num_seconds()),
        "Starting quiz"
    );
    Ok(QuizSession::new(QuizEngine::start(questions), name, bands).with_time_limit(time_limit))
}

/// Finishes a timed attempt once its limit has run out at `now`, taking the
/// normal route to the results screen. Returns whether it did.
pub fn tick_quiz(session: &mut QuizSession, app_state: &mut AppState, now: DateTime<Local>) -> bool {
    if !matches!(*app_state, AppState::Quiz | AppState::QuizQuitConfirm) {
        return false;
    }
    if session.remaining_at(now) != Some(chrono::Duration::zero()) {
        return false;
    }
    match session.engine.time_up() {
        Ok(()) => {
            session.finished_at = Some(now);
            session.review_scroll_y = 0;
            *app_state = AppState::Summary;
            true
        }
        Err(e) => {
            debug!(error = %e, "Time limit ignored");
            false
        }
    }
}

/// Loads `path` and picks one question at random for an inline check.
pub fn start_check<R: Rng + ?Sized>(path: &Path, rng: &mut R) -> Result<CheckSession> {
    let loaded = load_question_file(path)?;
    if loaded.questions.is_empty() {
        return Err(QuizError::EmptyQuestionSet);
    }
    let pick = rng.gen_range(0..loaded.questions.len());
    let question = loaded.questions[pick].clone();
    info!(quiz = %loaded.name, question = pick, "Starting inline check");
    Ok(CheckSession::new(InlineCheck::new(question)?, loaded.name))
}

fn digit_option(c: char) -> Option<usize> {
    c.to_digit(10)
        .filter(|d| (1..=9).contains(d))
        .map(|d| d as usize - 1)
}

fn select(session: &mut QuizSession, option: usize) {
    if let Err(e) = session.engine.select_answer(option) {
        debug!(error = %e, "Selection rejected");
        return;
    }
    session.highlighted = option;
}

fn navigate(session: &mut QuizSession, result: Result<()>) {
    match result {
        Ok(()) => session.sync_highlight(),
        Err(e) => debug!(error = %e, "Navigation rejected"),
    }
}

pub fn handle_quiz_input(session: &mut QuizSession, key: KeyEvent, app_state: &mut AppState) {
    let option_count = session.engine.current_question().options.len();

    match key.code {
        KeyCode::Esc => {
            *app_state = AppState::QuizQuitConfirm;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            session.highlighted = session.highlighted.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if session.highlighted + 1 < option_count {
                session.highlighted += 1;
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let option = session.highlighted;
            select(session, option);
        }
        KeyCode::Right | KeyCode::Tab | KeyCode::Char('n') => match session.engine.next() {
            Ok(Mode::Results) => {
                session.finished_at = Some(Local::now());
                session.review_scroll_y = 0;
                *app_state = AppState::Summary;
            }
            Ok(Mode::InProgress) => session.sync_highlight(),
            Err(e) => debug!(error = %e, "Advance rejected"),
        },
        KeyCode::Left | KeyCode::BackTab | KeyCode::Char('p') => {
            let result = session.engine.previous();
            navigate(session, result);
        }
        KeyCode::Home => {
            let result = session.engine.jump_to(0);
            navigate(session, result);
        }
        KeyCode::End => {
            let last = session.engine.question_count() - 1;
            let result = session.engine.jump_to(last);
            navigate(session, result);
        }
        KeyCode::Char('u') => {
            if let Some(index) = session.engine.first_unanswered() {
                let result = session.engine.jump_to(index);
                navigate(session, result);
            }
        }
        KeyCode::Char(c) => {
            if let Some(option) = digit_option(c) {
                select(session, option);
            }
        }
        _ => {}
    }
}

pub fn handle_quit_confirm_input(key: KeyEvent, app_state: &mut AppState) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => *app_state = AppState::Menu,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => *app_state = AppState::Quiz,
        _ => {}
    }
}

pub fn handle_summary_input(session: &mut QuizSession, key: KeyEvent, app_state: &mut AppState) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            session.review_scroll_y = session.review_scroll_y.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            session.review_scroll_y = session.review_scroll_y.saturating_add(1);
        }
        KeyCode::PageUp => {
            session.review_scroll_y = session.review_scroll_y.saturating_sub(10);
        }
        KeyCode::PageDown => {
            session.review_scroll_y = session.review_scroll_y.saturating_add(10);
        }
        KeyCode::Char('r') => {
            session.engine.restart();
            session.highlighted = 0;
            session.review_scroll_y = 0;
            session.started_at = Local::now();
            session.finished_at = None;
            *app_state = AppState::Quiz;
        }
        KeyCode::Char('m') => {
            *app_state = AppState::Menu;
        }
        _ => {}
    }
}

pub fn handle_check_input(session: &mut CheckSession, key: KeyEvent, app_state: &mut AppState) {
    let option_count = session.check.question().options.len();

    let chosen = match key.code {
        KeyCode::Esc | KeyCode::Char('m') => {
            *app_state = AppState::Menu;
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            session.highlighted = session.highlighted.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if session.highlighted + 1 < option_count {
                session.highlighted += 1;
            }
            None
        }
        KeyCode::Char('r') => {
            session.check.reset();
            session.highlighted = 0;
            None
        }
        KeyCode::Enter | KeyCode::Char(' ') => Some(session.highlighted),
        KeyCode::Char(c) => digit_option(c),
        _ => None,
    };

    if let Some(option) = chosen {
        match session.check.select_answer(option) {
            Ok(feedback) => {
                session.highlighted = option;
                info!(correct = feedback.is_correct, "Inline check answered");
            }
            Err(e) => debug!(error = %e, "Inline check selection rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::three_questions;
    use crate::scoring::{GradeBands, ScoreReport};
    use crossterm::event::KeyModifiers;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn session() -> QuizSession {
        let engine = QuizEngine::from_records(three_questions()).unwrap();
        QuizSession::new(engine, "Test Deck", GradeBands::default())
    }

    fn press(session: &mut QuizSession, state: &mut AppState, codes: &[KeyCode]) {
        for code in codes {
            handle_quiz_input(session, key(*code), state);
        }
    }

    #[test]
    fn test_highlight_moves_within_options() {
        let mut session = session();
        let mut state = AppState::Quiz;
        press(&mut session, &mut state, &[KeyCode::Up]);
        assert_eq!(session.highlighted, 0);
        press(&mut session, &mut state, &[KeyCode::Down, KeyCode::Down, KeyCode::Down]);
        assert_eq!(session.highlighted, 2);
        assert_eq!(session.engine.current_selection(), None);
    }

    #[test]
    fn test_enter_selects_highlighted_option_without_advancing() {
        let mut session = session();
        let mut state = AppState::Quiz;
        press(&mut session, &mut state, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(session.engine.current_selection(), Some(1));
        assert_eq!(session.engine.current_index(), 0);
    }

    #[test]
    fn test_digit_keys_select_directly() {
        let mut session = session();
        let mut state = AppState::Quiz;
        press(&mut session, &mut state, &[KeyCode::Char('3')]);
        assert_eq!(session.engine.current_selection(), Some(2));
        assert_eq!(session.highlighted, 2);

        // out of range for a three-option question
        press(&mut session, &mut state, &[KeyCode::Char('9')]);
        assert_eq!(session.engine.current_selection(), Some(2));

        press(&mut session, &mut state, &[KeyCode::Char('0')]);
        assert_eq!(session.engine.current_selection(), Some(2));
    }

    #[test]
    fn test_next_blocked_until_answered() {
        let mut session = session();
        let mut state = AppState::Quiz;
        press(&mut session, &mut state, &[KeyCode::Right]);
        assert_eq!(session.engine.current_index(), 0);
        assert_eq!(state, AppState::Quiz);
    }

    #[test]
    fn test_full_run_reaches_summary() {
        let mut session = session();
        let mut state = AppState::Quiz;
        press(
            &mut session,
            &mut state,
            &[
                KeyCode::Char('2'),
                KeyCode::Right,
                KeyCode::Char('1'),
                KeyCode::Char('n'),
                KeyCode::Char('3'),
                KeyCode::Right,
            ],
        );
        assert_eq!(state, AppState::Summary);
        assert_eq!(session.engine.score(), 3);
        assert!(session.finished_at.is_some());
    }

    #[test]
    fn test_back_navigation_restores_highlight() {
        let mut session = session();
        let mut state = AppState::Quiz;
        press(&mut session, &mut state, &[KeyCode::Char('2'), KeyCode::Right]);
        assert_eq!(session.highlighted, 0);
        press(&mut session, &mut state, &[KeyCode::Left]);
        assert_eq!(session.engine.current_index(), 0);
        assert_eq!(session.highlighted, 1);
    }

    #[test]
    fn test_jump_keys() {
        let mut session = session();
        let mut state = AppState::Quiz;
        press(&mut session, &mut state, &[KeyCode::End]);
        assert_eq!(session.engine.current_index(), 2);
        press(&mut session, &mut state, &[KeyCode::Char('1'), KeyCode::Home]);
        assert_eq!(session.engine.current_index(), 0);
        press(&mut session, &mut state, &[KeyCode::Char('1'), KeyCode::End, KeyCode::Char('u')]);
        assert_eq!(session.engine.current_index(), 1);
    }

    #[test]
    fn test_escape_asks_for_confirmation() {
        let mut session = session();
        let mut state = AppState::Quiz;
        press(&mut session, &mut state, &[KeyCode::Esc]);
        assert_eq!(state, AppState::QuizQuitConfirm);

        handle_quit_confirm_input(key(KeyCode::Char('n')), &mut state);
        assert_eq!(state, AppState::Quiz);
        handle_quit_confirm_input(key(KeyCode::Esc), &mut state);
        assert_eq!(state, AppState::Quiz);

        state = AppState::QuizQuitConfirm;
        handle_quit_confirm_input(key(KeyCode::Char('y')), &mut state);
        assert_eq!(state, AppState::Menu);
    }

    #[test]
    fn test_summary_restart_and_scroll() {
        let mut session = session();
        let mut state = AppState::Quiz;
        press(
            &mut session,
            &mut state,
            &[KeyCode::Char('2'), KeyCode::Right, KeyCode::Char('1'), KeyCode::Right, KeyCode::Char('1'), KeyCode::Right],
        );
        assert_eq!(state, AppState::Summary);

        handle_summary_input(&mut session, key(KeyCode::Down), &mut state);
        handle_summary_input(&mut session, key(KeyCode::PageDown), &mut state);
        assert_eq!(session.review_scroll_y, 11);
        handle_summary_input(&mut session, key(KeyCode::Up), &mut state);
        assert_eq!(session.review_scroll_y, 10);

        handle_summary_input(&mut session, key(KeyCode::Char('r')), &mut state);
        assert_eq!(state, AppState::Quiz);
        assert_eq!(session.engine.score(), 0);
        assert_eq!(session.engine.current_index(), 0);
        assert_eq!(session.review_scroll_y, 0);
        assert!(session.finished_at.is_none());
    }

    #[test]
    fn test_summary_back_to_menu() {
        let mut session = session();
        let mut state = AppState::Summary;
        handle_summary_input(&mut session, key(KeyCode::Char('m')), &mut state);
        assert_eq!(state, AppState::Menu);
    }

    #[test]
    fn test_check_input_reveals_and_resets() {
        let question = three_questions().remove(0);
        let mut check = CheckSession::new(InlineCheck::new(question).unwrap(), "Deck");
        let mut state = AppState::Check;

        handle_check_input(&mut check, key(KeyCode::Down), &mut state);
        handle_check_input(&mut check, key(KeyCode::Enter), &mut state);
        assert!(check.check.is_revealed());
        assert!(check.check.feedback().unwrap().is_correct);

        // further selections are ignored until reset
        handle_check_input(&mut check, key(KeyCode::Char('1')), &mut state);
        assert_eq!(check.check.selected(), Some(1));

        handle_check_input(&mut check, key(KeyCode::Char('r')), &mut state);
        assert!(!check.check.is_revealed());
        assert_eq!(check.highlighted, 0);

        handle_check_input(&mut check, key(KeyCode::Esc), &mut state);
        assert_eq!(state, AppState::Menu);
    }

    #[test]
    fn test_start_session_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coshh.csv");
        std::fs::write(
            &path,
            "What does COSHH cover?,0,,Hazardous substances,Working at height\nWho writes the assessment?,Employer,,Employee,Employer\n",
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let session = start_session(&path, &AppConfig::default(), &mut rng).unwrap();
        assert_eq!(session.deck_name, "coshh");
        assert_eq!(session.engine.question_count(), 2);
        assert_eq!(session.bands, GradeBands::default());

        let check = start_check(&path, &mut rng).unwrap();
        assert_eq!(check.deck_name, "coshh");
        assert!(!check.check.is_revealed());
    }

    #[test]
    fn test_start_session_rejects_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "\n# nothing here\n").unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let err = start_session(&path, &AppConfig::default(), &mut rng).unwrap_err();
        assert!(matches!(err, QuizError::EmptyQuestionSet));
        let err = start_check(&path, &mut rng).unwrap_err();
        assert!(matches!(err, QuizError::EmptyQuestionSet));
    }

    #[test]
    fn test_time_limit_ends_attempt_at_results() {
        let mut session = session().with_time_limit(Some(chrono::Duration::seconds(60)));
        let mut state = AppState::Quiz;
        press(&mut session, &mut state, &[KeyCode::Char('2'), KeyCode::Right]);

        let start = session.started_at;
        assert!(!tick_quiz(&mut session, &mut state, start + chrono::Duration::seconds(30)));
        assert_eq!(state, AppState::Quiz);
        assert_eq!(
            session.remaining_at(start + chrono::Duration::seconds(30)),
            Some(chrono::Duration::seconds(30))
        );

        let late = start + chrono::Duration::seconds(61);
        assert!(tick_quiz(&mut session, &mut state, late));
        assert_eq!(state, AppState::Summary);
        assert_eq!(session.finished_at, Some(late));
        assert!(session.engine.state().timed_out());

        let report = ScoreReport::from_engine(&session.engine, session.bands);
        assert_eq!(report.correct, 1);
        assert_eq!(report.unanswered(), 2);

        // keys after the deadline go to the summary handler, not the quiz
        assert!(!tick_quiz(&mut session, &mut state, late));
    }

    #[test]
    fn test_time_limit_also_applies_during_quit_prompt() {
        let mut session = session().with_time_limit(Some(chrono::Duration::seconds(10)));
        let mut state = AppState::QuizQuitConfirm;
        let late = session.started_at + chrono::Duration::seconds(10);
        assert!(tick_quiz(&mut session, &mut state, late));
        assert_eq!(state, AppState::Summary);
    }

    #[test]
    fn test_untimed_quiz_never_expires() {
        let mut session = session();
        let mut state = AppState::Quiz;
        let much_later = session.started_at + chrono::Duration::hours(5);
        assert!(!tick_quiz(&mut session, &mut state, much_later));
        assert_eq!(state, AppState::Quiz);
        assert_eq!(session.remaining_at(much_later), None);
    }

    #[test]
    fn test_start_session_applies_exam_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mock.toml");
        std::fs::write(
            &path,
            r#"
title = "Mock Exam"
total_questions = 2
time_limit = 1800
pass_threshold = 80

[[questions]]
question = "Q1"
options = ["a", "b"]
answer = 0

[[questions]]
question = "Q2"
options = ["a", "b"]
answer = 1

[[questions]]
question = "Q3"
options = ["a", "b"]
answer = "a"
"#,
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(8);
        let session = start_session(&path, &AppConfig::default(), &mut rng).unwrap();
        assert_eq!(session.deck_name, "Mock Exam");
        assert_eq!(session.engine.question_count(), 2);
        assert_eq!(session.bands.pass_mark, 80);
        assert_eq!(session.time_limit, Some(chrono::Duration::seconds(1800)));
    }
}
