use crate::bank::quiz_name;
use crate::config::AppConfig;
use crate::utils::truncate_string;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::path::{Path, PathBuf};

fn format_file_item(path: &Path) -> String {
    let format = path
        .extension()
        .map(|e| e.to_string_lossy().to_uppercase())
        .unwrap_or_default();
    format!("{} [{}]", quiz_name(path), format)
}

fn settings_lines(config: &AppConfig) -> Vec<Line<'static>> {
    let questions = match config.sample_size {
        Some(n) => format!("Questions: {} per attempt", n),
        None => "Questions: all".to_string(),
    };
    vec![
        Line::from(format!(
            "Pass: {}%  Marginal: {}%",
            config.pass_mark, config.marginal_mark
        )),
        Line::from(questions),
    ]
}

pub fn draw_menu(
    f: &mut Frame,
    quiz_files: &[PathBuf],
    selected_file_index: usize,
    config: &AppConfig,
    status: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(f.area());

    let title = Paragraph::new(format!("Course Quiz v{}", env!("CARGO_PKG_VERSION")))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let max_width = chunks[1].width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = if quiz_files.is_empty() {
        vec![ListItem::new(format!(
            "No question sets found in {}",
            config.quiz_dir.display()
        ))
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        quiz_files
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let style = if i == selected_file_index {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(truncate_string(&format_file_item(path), max_width)).style(style)
            })
            .collect()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Select a Question Set"),
    );
    f.render_widget(list, chunks[1]);

    let (status_text, status_style) = match status {
        Some(message) => (message.to_string(), Style::default().fg(Color::Red)),
        None => (
            format!("{} question set(s)", quiz_files.len()),
            Style::default().fg(Color::DarkGray),
        ),
    };
    let status = Paragraph::new(status_text)
        .style(status_style)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[2]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[3]);

    let settings = Paragraph::new(settings_lines(config))
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL).title("Settings"));
    f.render_widget(settings, bottom[0]);

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(vec![
            Span::styled("↑/↓", key_style),
            Span::from(" Navigate  "),
            Span::styled("Enter", key_style),
            Span::from(" Start Quiz  "),
            Span::styled("c", key_style),
            Span::from(" Quick Check"),
        ]),
        Line::from(vec![
            Span::styled("r", key_style),
            Span::from(" Refresh  "),
            Span::styled("Esc/q", key_style),
            Span::from(" Quit"),
        ]),
    ];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, bottom[1]);
}
