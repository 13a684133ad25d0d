use crate::engine::QuestionSet;
use crate::models::QuizSession;
use crate::scoring::{Grade, ScoreReport};
use crate::ui::layout::calculate_summary_chunks;
use crate::utils::{
    calculate_max_scroll, estimate_text_height, format_elapsed, option_label, render_markdown,
};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::Pass => Color::Green,
        Grade::Marginal => Color::Yellow,
        Grade::Fail => Color::Red,
    }
}

fn describe_option(options: &[String], index: usize) -> String {
    match options.get(index) {
        Some(text) => format!("{}. {}", option_label(index), text),
        None => "?".to_string(),
    }
}

/// Per-question breakdown: marker, prompt, the learner's answer, the correct
/// answer and the explanation.
pub fn review_text(report: &ScoreReport, questions: &QuestionSet) -> Text<'static> {
    let mut text = Text::default();

    for (review, question) in report.reviews.iter().zip(questions.iter()) {
        let (marker, color) = match (review.selected, review.is_correct) {
            (_, true) => ("✓", Color::Green),
            (Some(_), false) => ("✗", Color::Red),
            (None, _) => ("–", Color::DarkGray),
        };
        text.push_line(Line::from(vec![
            Span::styled(
                format!("{} ", marker),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{}. {}", review.index + 1, question.prompt),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));

        let your_answer = match review.selected {
            Some(selected) => describe_option(&question.options, selected),
            None => "(not answered)".to_string(),
        };
        text.push_line(Line::from(vec![
            Span::styled("   Your answer: ", Style::default().fg(Color::Yellow)),
            Span::from(your_answer),
        ]));
        if !review.is_correct {
            text.push_line(Line::from(vec![
                Span::styled("   Correct answer: ", Style::default().fg(Color::Green)),
                Span::from(describe_option(&question.options, review.correct_index)),
            ]));
        }
        if !question.explanation.trim().is_empty() {
            for line in render_markdown(&question.explanation) {
                let mut spans = vec![Span::from("   ")];
                spans.extend(line.spans);
                text.push_line(Line::from(spans));
            }
        }
        text.push_line(Line::from(""));
    }

    text
}

pub fn score_lines(report: &ScoreReport, elapsed: Option<chrono::Duration>) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(
                    "Score: {} / {} ({}%)  ",
                    report.correct, report.total, report.percentage
                ),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                report.grade.label(),
                Style::default()
                    .fg(grade_color(report.grade))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(report.message),
    ];

    if report.timed_out {
        lines.push(Line::from(Span::styled(
            "Time limit reached. Unanswered questions count as incorrect.",
            Style::default().fg(Color::Red),
        )));
    }

    let mut counts = format!(
        "Correct: {}  Incorrect: {}  Unanswered: {}",
        report.correct,
        report.incorrect(),
        report.unanswered()
    );
    if let Some(elapsed) = elapsed {
        counts.push_str(&format!("  Time: {}", format_elapsed(elapsed)));
    }
    lines.push(Line::from(counts));

    if !report.topics.is_empty() {
        let topics = report
            .topics
            .iter()
            .map(|t| format!("{} {}/{}", t.topic, t.correct, t.total))
            .collect::<Vec<_>>()
            .join("  ·  ");
        lines.push(Line::from(Span::styled(
            topics,
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}

pub fn draw_summary(f: &mut Frame, session: &mut QuizSession) {
    let layout = calculate_summary_chunks(f.area());
    let report = ScoreReport::from_engine(&session.engine, session.bands);

    let title = Paragraph::new(format!("Results - {}", session.deck_name))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let score = Paragraph::new(score_lines(&report, Some(session.elapsed())))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Score"));
    f.render_widget(score, layout.score_area);

    let review = review_text(&report, session.engine.questions());
    let visible_height = layout.review_area.height.saturating_sub(2) as usize;
    let text_width = layout.review_area.width.saturating_sub(2) as usize;
    let max_scroll = calculate_max_scroll(estimate_text_height(&review, text_width), visible_height);
    session.review_scroll_y = session.review_scroll_y.min(max_scroll);

    let review = Paragraph::new(review)
        .wrap(Wrap { trim: false })
        .scroll((session.review_scroll_y, 0))
        .block(Block::default().borders(Borders::ALL).title("Review"));
    f.render_widget(review, layout.review_area);

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let help_text = vec![Line::from(vec![
        Span::styled("↑/↓", key_style),
        Span::from(" Scroll  "),
        Span::styled("r", key_style),
        Span::from(" Restart  "),
        Span::styled("m", key_style),
        Span::from(" Main Menu  "),
        Span::styled("Esc", key_style),
        Span::from(" Quit"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}
