use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Greedy word wrap. Returns the char-index range of every line; a line
/// keeps the space that follows its last word.
pub fn wrap_lines(text: &str, width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    let words: Vec<&str> = text.split(' ').collect();
    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut line_width = 0;
    let mut idx = 0;

    for (i, word) in words.iter().enumerate() {
        let trailing = usize::from(i + 1 < words.len());
        let word_width = word.width();

        if line_width > 0 && line_width + word_width > width {
            lines.push(line_start..idx);
            line_start = idx;
            line_width = 0;
        }

        line_width += word_width + trailing;
        idx += word.chars().count() + trailing;
    }

    if idx > line_start || lines.is_empty() {
        lines.push(line_start..idx);
    }
    lines
}

/// Index of the line holding `cursor`; the end of the text belongs to the
/// last line.
pub fn cursor_line(lines: &[Range<usize>], cursor: usize) -> usize {
    lines
        .iter()
        .position(|r| r.contains(&cursor))
        .unwrap_or(lines.len().saturating_sub(1))
}

/// First line to show so the cursor sits on the second visible line, or the
/// only one when a single line fits.
pub fn first_visible_line(total: usize, cursor_line: usize, visible: usize) -> usize {
    cursor_line
        .saturating_sub(usize::from(visible > 1))
        .min(total.saturating_sub(visible))
}

/// The prompt, colored by what has been typed so far.
pub struct TypingArea<'a> {
    pub target: &'a str,
    pub input: &'a str,
    pub finished: bool,
}

impl TypingArea<'_> {
    fn char_style(&self, typed: Option<char>, expected: char, is_cursor: bool) -> Style {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        match typed {
            Some(c) if c == expected => bold.fg(Color::Green),
            Some(_) => bold.fg(Color::Red).add_modifier(Modifier::UNDERLINED),
            None if is_cursor => bold.add_modifier(Modifier::REVERSED),
            None => bold.add_modifier(Modifier::DIM),
        }
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let target: Vec<char> = self.target.chars().collect();
        let input: Vec<char> = self.input.chars().collect();
        let cursor = input.len();

        let lines = wrap_lines(self.target, area.width as usize);
        let current = cursor_line(&lines, cursor);
        let first = first_visible_line(lines.len(), current, area.height as usize);

        let rendered: Vec<Line> = lines
            .iter()
            .skip(first)
            .take(area.height as usize)
            .map(|range| {
                let spans: Vec<Span> = range
                    .clone()
                    .filter_map(|idx| target.get(idx).map(|c| (idx, *c)))
                    .map(|(idx, expected)| {
                        let typed = input.get(idx).copied();
                        let is_cursor = idx == cursor && !self.finished;
                        let symbol = match (typed, expected) {
                            (Some(t), ' ') if t != ' ' => "·".to_string(),
                            _ => expected.to_string(),
                        };
                        Span::styled(symbol, self.char_style(typed, expected, is_cursor))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let style = if self.finished {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };
        Paragraph::new(rendered).style(style).render(area, buf);
    }
}
