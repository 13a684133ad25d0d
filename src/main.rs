use course_quiz::{
    draw_inline_check, draw_menu, draw_quit_confirmation, draw_quiz, draw_summary,
    get_quiz_files, handle_check_input, handle_quit_confirm_input, handle_quiz_input,
    handle_summary_input, load_config, logger, start_check, start_session, tick_quiz, AppConfig,
    AppState, CheckSession, QuizError, QuizSession,
};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

type Backend = CrosstermBackend<io::Stdout>;

/// How often the screen refreshes while waiting for a key, so the exam clock
/// keeps moving.
const TICK: Duration = Duration::from_millis(250);

fn load_failure(path: &Path, e: &QuizError) -> String {
    if e.is_data_error() {
        format!("Invalid question file {}: {}", path.display(), e)
    } else {
        format!("Could not load {}: {}", path.display(), e)
    }
}

fn main() -> io::Result<()> {
    let loaded = load_config();
    let config = loaded.config.clone();
    if let Err(e) = logger::init(&config.log_file) {
        eprintln!(
            "Warning: could not open log file {}: {}",
            config.log_file.display(),
            e
        );
    }
    info!(quiz_dir = %config.quiz_dir.display(), "course-quiz starting");
    loaded.log();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("course-quiz exiting");
    result
}

fn run(terminal: &mut Terminal<Backend>, config: &AppConfig) -> io::Result<()> {
    let mut app_state = AppState::Menu;
    let mut quiz_files: Vec<PathBuf> = get_quiz_files(&config.quiz_dir);
    let mut selected_file_index: usize = 0;
    let mut status: Option<String> = None;
    let mut quiz_session: Option<QuizSession> = None;
    let mut check_session: Option<CheckSession> = None;
    let mut rng = rand::thread_rng();

    loop {
        terminal.draw(|f| match app_state {
            AppState::Menu => draw_menu(
                f,
                &quiz_files,
                selected_file_index,
                config,
                status.as_deref(),
            ),
            AppState::Quiz => {
                if let Some(session) = &quiz_session {
                    draw_quiz(f, session);
                }
            }
            AppState::QuizQuitConfirm => draw_quit_confirmation(f),
            AppState::Summary => {
                if let Some(session) = &mut quiz_session {
                    draw_summary(f, session);
                }
            }
            AppState::Check => {
                if let Some(session) = &check_session {
                    draw_inline_check(f, session);
                }
            }
        })?;

        if let Some(session) = &mut quiz_session {
            tick_quiz(session, &mut app_state, Local::now());
        }
        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            break;
        }

        match app_state {
            AppState::Menu => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    selected_file_index = selected_file_index.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if selected_file_index < quiz_files.len().saturating_sub(1) {
                        selected_file_index += 1;
                    }
                }
                KeyCode::Enter => {
                    if let Some(path) = quiz_files.get(selected_file_index) {
                        match start_session(path, config, &mut rng) {
                            Ok(session) => {
                                quiz_session = Some(session);
                                status = None;
                                app_state = AppState::Quiz;
                            }
                            Err(e) => {
                                warn!(path = %path.display(), error = %e, "Failed to start quiz");
                                status = Some(load_failure(path, &e));
                            }
                        }
                    }
                }
                KeyCode::Char('c') => {
                    if let Some(path) = quiz_files.get(selected_file_index) {
                        match start_check(path, &mut rng) {
                            Ok(session) => {
                                check_session = Some(session);
                                status = None;
                                app_state = AppState::Check;
                            }
                            Err(e) => {
                                warn!(path = %path.display(), error = %e, "Failed to start check");
                                status = Some(load_failure(path, &e));
                            }
                        }
                    }
                }
                KeyCode::Char('r') => {
                    quiz_files = get_quiz_files(&config.quiz_dir);
                    selected_file_index = selected_file_index.min(quiz_files.len().saturating_sub(1));
                    status = None;
                }
                KeyCode::Esc | KeyCode::Char('q') => break,
                _ => {}
            },
            AppState::Quiz => {
                if let Some(session) = &mut quiz_session {
                    handle_quiz_input(session, key, &mut app_state);
                }
            }
            AppState::QuizQuitConfirm => handle_quit_confirm_input(key, &mut app_state),
            AppState::Summary => {
                if key.code == KeyCode::Esc {
                    break;
                }
                if let Some(session) = &mut quiz_session {
                    handle_summary_input(session, key, &mut app_state);
                }
            }
            AppState::Check => {
                if let Some(session) = &mut check_session {
                    handle_check_input(session, key, &mut app_state);
                }
            }
        }

        if app_state == AppState::Menu {
            quiz_session = None;
            check_session = None;
        }
    }

    Ok(())
}
