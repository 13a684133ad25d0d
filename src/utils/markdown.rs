use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;
use std::sync::OnceLock;

fn inline_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\*\*(?P<bold>.+?)\*\*|\*(?P<italic>[^*]+)\*|`(?P<code>[^`]+)`")
            .expect("valid inline markdown pattern")
    })
}

fn numbered_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)[.)]\s+(.*)$").expect("valid list pattern"))
}

/// Renders the light markdown used in explanations: **bold**, *italic*,
/// `code`, and bulleted or numbered list items.
pub fn render_markdown(content: &str) -> Vec<Line<'static>> {
    content
        .lines()
        .map(|line| {
            let trimmed = line.trim();

            if let Some(item) = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
            {
                let mut spans = vec![Span::from("  • ")];
                spans.extend(parse_inline(item));
                return Line::from(spans);
            }

            if let Some(caps) = numbered_re().captures(trimmed) {
                let mut spans = vec![Span::from(format!("  {}. ", &caps[1]))];
                spans.extend(parse_inline(&caps[2]));
                return Line::from(spans);
            }

            Line::from(parse_inline(line))
        })
        .collect()
}

fn parse_inline(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in inline_re().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::from(text[last..whole.start()].to_string()));
        }

        let (inner, modifier) = if let Some(m) = caps.name("bold") {
            (m.as_str(), Modifier::BOLD)
        } else if let Some(m) = caps.name("italic") {
            (m.as_str(), Modifier::ITALIC)
        } else if let Some(m) = caps.name("code") {
            (m.as_str(), Modifier::DIM)
        } else {
            (whole.as_str(), Modifier::empty())
        };
        spans.push(Span::styled(
            inner.to_string(),
            Style::default().add_modifier(modifier),
        ));
        last = whole.end();
    }

    if last < text.len() || spans.is_empty() {
        spans.push(Span::from(text[last..].to_string()));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_plain_text_passes_through() {
        let lines = render_markdown("BS 7671 requires 1 MΩ minimum.");
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "BS 7671 requires 1 MΩ minimum.");
    }

    #[test]
    fn test_inline_styles() {
        let lines = render_markdown("Use **isolation** before *any* work on `L1`.");
        let spans = &lines[0].spans;
        assert_eq!(line_text(&lines[0]), "Use isolation before any work on L1.");

        let bold = spans.iter().find(|s| s.content == "isolation").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
        let italic = spans.iter().find(|s| s.content == "any").unwrap();
        assert!(italic.style.add_modifier.contains(Modifier::ITALIC));
        let code = spans.iter().find(|s| s.content == "L1").unwrap();
        assert!(code.style.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_lists() {
        let lines = render_markdown("Steps:\n- Isolate\n* Lock off\n1. Prove dead\n2) Test");
        assert_eq!(lines.len(), 5);
        assert_eq!(line_text(&lines[1]), "  • Isolate");
        assert_eq!(line_text(&lines[2]), "  • Lock off");
        assert_eq!(line_text(&lines[3]), "  1. Prove dead");
        assert_eq!(line_text(&lines[4]), "  2. Test");
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let lines = render_markdown("First\n\nSecond");
        assert_eq!(lines.len(), 3);
        assert_eq!(line_text(&lines[1]), "");
    }

    #[test]
    fn test_unclosed_marker_is_literal() {
        let lines = render_markdown("2 * 3 = 6");
        assert_eq!(line_text(&lines[0]), "2 * 3 = 6");
    }
}
