use crate::models::CheckSession;
use crate::ui::layout::calculate_check_chunks;
use crate::ui::quiz::option_lines;
use crate::utils::{option_label, render_markdown};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_inline_check(f: &mut Frame, session: &CheckSession) {
    let layout = calculate_check_chunks(f.area());
    let question = session.check.question();
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let header = Paragraph::new(format!("Quick Check - {}", session.deck_name))
        .style(key_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let prompt = Paragraph::new(Text::from(question.prompt.as_str()))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(prompt, layout.question_area);

    let options = Paragraph::new(option_lines(
        &question.options,
        session.highlighted,
        session.check.selected(),
    ))
    .wrap(Wrap { trim: false })
    .block(Block::default().borders(Borders::ALL).title("Options"));
    f.render_widget(options, layout.options_area);

    let mut feedback_text = Text::default();
    if let Some(feedback) = session.check.feedback() {
        if feedback.is_correct {
            feedback_text.push_line(Line::from(Span::styled(
                "✓ Correct!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        } else {
            feedback_text.push_line(Line::from(Span::styled(
                "✗ Incorrect",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            if let Some(correct) = question.correct_option() {
                feedback_text.push_line(Line::from(format!(
                    "Correct answer: {}. {}",
                    option_label(feedback.correct_index),
                    correct
                )));
            }
        }
        if !feedback.explanation.trim().is_empty() {
            feedback_text.push_line(Line::from(""));
            feedback_text.extend(render_markdown(&feedback.explanation));
        }
    } else {
        feedback_text.push_line(Line::from(Span::styled(
            "Choose an answer to see feedback.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    let feedback = Paragraph::new(feedback_text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Feedback"));
    f.render_widget(feedback, layout.feedback_area);

    let help_text = vec![Line::from(vec![
        Span::styled("↑/↓", key_style),
        Span::from(" Move  "),
        Span::styled("Enter/1-9", key_style),
        Span::from(" Answer  "),
        Span::styled("r", key_style),
        Span::from(" Try Again  "),
        Span::styled("m/Esc", key_style),
        Span::from(" Main Menu"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}
