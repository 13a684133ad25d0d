use crate::engine::QuizEngine;
use crate::models::QuizSession;
use crate::ui::layout::calculate_quiz_chunks;
use crate::utils::{format_elapsed, option_label};
use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// One dot per question: current, answered or still open.
pub fn progress_spans(engine: &QuizEngine) -> Vec<Span<'static>> {
    let mut spans: Vec<Span> = (0..engine.question_count())
        .map(|i| {
            if i == engine.current_index() {
                Span::styled("◉ ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            } else if engine.is_answered(i) {
                Span::styled("● ", Style::default().fg(Color::Green))
            } else {
                Span::styled("○ ", Style::default().fg(Color::DarkGray))
            }
        })
        .collect();
    spans.push(Span::from(format!(
        " {}/{} answered",
        engine.answered_count(),
        engine.question_count()
    )));
    spans
}

/// Option rows with the cursor and the recorded choice marked.
pub fn option_lines(options: &[String], highlighted: usize, selected: Option<usize>) -> Vec<Line<'static>> {
    options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let cursor = if i == highlighted { "> " } else { "  " };
            let mark = if selected == Some(i) { "(•)" } else { "( )" };
            let style = if selected == Some(i) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if i == highlighted {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("{}{} {}. {}", cursor, mark, option_label(i), option),
                style,
            ))
        })
        .collect()
}

pub fn draw_quiz(f: &mut Frame, session: &QuizSession) {
    let layout = calculate_quiz_chunks(f.area());
    let engine = &session.engine;
    let question = engine.current_question();

    let mut progress = format!(
        "Question {} / {} - {}",
        engine.current_index() + 1,
        engine.question_count(),
        session.deck_name
    );
    if let Some(group) = question.group() {
        progress.push_str(&format!(" ({})", group));
    }
    if let Some(left) = session.remaining_at(Local::now()) {
        progress.push_str(&format!(" - {} left", format_elapsed(left)));
    }
    let header = Paragraph::new(progress)
        .style(key_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let dots = Paragraph::new(Line::from(progress_spans(engine)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Progress"));
    f.render_widget(dots, layout.progress_area);

    let prompt = Paragraph::new(Text::from(question.prompt.as_str()))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(prompt, layout.question_area);

    let options = Paragraph::new(option_lines(
        &question.options,
        session.highlighted,
        engine.current_selection(),
    ))
    .wrap(Wrap { trim: false })
    .block(Block::default().borders(Borders::ALL).title("Options"));
    f.render_widget(options, layout.options_area);

    let advance_label = if engine.is_last() { " Finish  " } else { " Next  " };
    let advance_style = if engine.can_advance() {
        key_style()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let help_text = vec![
        Line::from(vec![
            Span::styled("↑/↓", key_style()),
            Span::from(" Move  "),
            Span::styled("Enter/1-9", key_style()),
            Span::from(" Choose  "),
            Span::styled("→", advance_style),
            Span::styled(advance_label, advance_style),
            Span::styled("←", key_style()),
            Span::from(" Previous"),
        ]),
        Line::from(vec![
            Span::styled("Home/End", key_style()),
            Span::from(" First/Last  "),
            Span::styled("u", key_style()),
            Span::from(" First Unanswered  "),
            Span::styled("Esc", key_style()),
            Span::from(" Quit to Menu  "),
            Span::styled("Ctrl+C", key_style()),
            Span::from(" Exit App"),
        ]),
    ];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit to Menu")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Return to main menu? Answers in this attempt will be lost.")
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (Return to Menu)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Continue Quiz)  "),
        Span::styled("Ctrl+C", key_style()),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::three_questions;

    #[test]
    fn test_progress_spans_mark_states() {
        let mut engine = QuizEngine::from_records(three_questions()).unwrap();
        engine.select_answer(0).unwrap();
        engine.next().unwrap();

        let spans = progress_spans(&engine);
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].content, "● ");
        assert_eq!(spans[1].content, "◉ ");
        assert_eq!(spans[2].content, "○ ");
        assert_eq!(spans[3].content, " 1/3 answered");
    }

    #[test]
    fn test_option_lines_marks_selection_and_cursor() {
        let options = vec!["Red".to_string(), "Blue".to_string(), "Green".to_string()];
        let lines = option_lines(&options, 2, Some(1));
        let text: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(text[0], "  ( ) A. Red");
        assert_eq!(text[1], "  (•) B. Blue");
        assert_eq!(text[2], "> ( ) C. Green");
    }
}
