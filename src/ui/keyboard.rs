use std::collections::HashMap;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

use turbotype::{
    highlight::KeyHighlight,
    layout::{KeyDef, KeyId},
};

const TARGET_BG: Color = Color::Rgb(217, 78, 40);
const PRESSED_BG: Color = Color::Rgb(157, 252, 3);

/// Cells per key unit below which keys are drawn without borders.
const MIN_BOXED_UNIT: u16 = 3;
const BOXED_ROW_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLook {
    Target,
    Pressed,
    Idle,
}

/// The target wins when a key is also held down.
pub fn key_look(h: KeyHighlight) -> KeyLook {
    if h.is_target {
        KeyLook::Target
    } else if h.is_pressed {
        KeyLook::Pressed
    } else {
        KeyLook::Idle
    }
}

fn key_style(look: KeyLook, special: bool) -> Style {
    match look {
        KeyLook::Target => Style::default()
            .bg(TARGET_BG)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        KeyLook::Pressed => Style::default()
            .bg(PRESSED_BG)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
        KeyLook::Idle if special => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM),
        KeyLook::Idle => Style::default().fg(Color::Gray),
    }
}

/// Widest row, in key units.
fn max_row_units(layout: &[&[KeyDef]]) -> f32 {
    layout
        .iter()
        .map(|row| row.iter().map(|k| k.width).sum::<f32>())
        .fold(0.0, f32::max)
}

/// Horizontal extent of every key in a row, relative to the row start.
/// Positions are rounded from the running total so widths never drift.
pub fn key_spans(row: &[KeyDef], unit: u16) -> Vec<(u16, u16)> {
    let mut spans = Vec::with_capacity(row.len());
    let mut units = 0.0_f32;
    for key in row {
        let start = (units * unit as f32).round() as u16;
        units += key.width;
        let end = (units * unit as f32).round() as u16;
        spans.push((start, end.saturating_sub(start)));
    }
    spans
}

/// Height the keyboard needs for a given width.
pub fn keyboard_height(layout: &[&[KeyDef]], width: u16) -> u16 {
    let rows = layout.len() as u16;
    if cell_unit(layout, width) >= MIN_BOXED_UNIT {
        rows * BOXED_ROW_HEIGHT
    } else {
        rows
    }
}

fn cell_unit(layout: &[&[KeyDef]], width: u16) -> u16 {
    let units = max_row_units(layout);
    if units <= 0.0 {
        return 0;
    }
    (width as f32 / units).floor() as u16
}

pub struct KeyboardWidget<'a> {
    pub layout: &'a [&'a [KeyDef]],
    pub highlights: &'a HashMap<KeyId, KeyHighlight>,
}

impl Widget for KeyboardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let unit = cell_unit(self.layout, area.width);
        if unit == 0 {
            return;
        }
        let boxed = unit >= MIN_BOXED_UNIT;
        let row_height = if boxed { BOXED_ROW_HEIGHT } else { 1 };

        for (row_idx, row) in self.layout.iter().enumerate() {
            let y = area.y + row_idx as u16 * row_height;
            if y + row_height > area.bottom() {
                break;
            }

            let spans = key_spans(row, unit);
            let row_width = spans.last().map(|(x, w)| x + w).unwrap_or(0);
            let x0 = area.x + area.width.saturating_sub(row_width) / 2;

            for (key, (dx, w)) in row.iter().zip(spans) {
                if w == 0 {
                    continue;
                }
                let rect = Rect::new(x0 + dx, y, w, row_height).intersection(area);
                let look = key_look(self.highlights.get(&key.code).copied().unwrap_or_default());
                let style = key_style(look, key.special);

                let label = Paragraph::new(key.label)
                    .alignment(Alignment::Center)
                    .style(style);
                if boxed {
                    label
                        .block(Block::default().borders(Borders::ALL).border_style(style))
                        .render(rect, buf);
                } else {
                    label.render(rect, buf);
                }
            }
        }
    }
}
