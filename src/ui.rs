pub mod keyboard;
pub mod typing_area;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use turbotype::{
    highlight::resolve_key_highlight,
    layout::TURKISH_F_LAYOUT,
    session::{FinalStats, Phase},
};

use crate::{
    ui::{
        keyboard::{keyboard_height, KeyboardWidget},
        typing_area::TypingArea,
    },
    App,
};

const HORIZONTAL_MARGIN: u16 = 4;
const VERTICAL_MARGIN: u16 = 1;
const TYPING_LINES: u16 = 3;
const RESULTS_WIDTH: u16 = 44;
const RESULTS_HEIGHT: u16 = 9;

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let inner = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([Constraint::Min(0)])
            .split(area)[0];

        let keyboard_lines = if self.show_keyboard {
            keyboard_height(TURKISH_F_LAYOUT, inner.width)
        } else {
            0
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Min(1),    // padding
                Constraint::Length(TYPING_LINES),
                Constraint::Min(1), // padding
                Constraint::Length(keyboard_lines),
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ])
            .split(inner);

        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);

        let title = Line::from(vec![
            Span::styled("TurboType", bold_style),
            Span::styled(".tr", dim_style),
        ]);
        Paragraph::new(title).render(header[0], buf);

        let stats = Line::from(vec![
            Span::styled(format!("{}s", session.remaining_secs()), dim_style),
            Span::raw("   "),
            Span::styled(
                format!("{} wpm", session.live_wpm()),
                bold_style.fg(Color::Yellow),
            ),
            Span::raw("   "),
            Span::styled(
                format!("{}%", session.live_accuracy()),
                bold_style.fg(Color::Green),
            ),
        ]);
        Paragraph::new(stats)
            .alignment(Alignment::Right)
            .render(header[1], buf);

        TypingArea {
            target: session.target_text(),
            input: session.user_input(),
            finished: session.is_finished(),
        }
        .render(chunks[2], buf);

        if self.show_keyboard {
            let highlights = resolve_key_highlight(session.target_key(), self.pressed.snapshot());
            KeyboardWidget {
                layout: TURKISH_F_LAYOUT,
                highlights: &highlights,
            }
            .render(chunks[4], buf);
        }

        let legend = match session.phase() {
            Phase::Waiting => "start typing / (tab) restart / (esc)ape",
            Phase::Running => "(tab) restart / (esc)ape",
            Phase::Finished => "(tab) new round / (esc)ape",
        };
        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

        if let Some(stats) = session.final_stats() {
            render_results(stats, area, buf);
        }
    }
}

fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_results(stats: &FinalStats, area: Rect, buf: &mut Buffer) {
    let rect = centered(RESULTS_WIDTH, RESULTS_HEIGHT, area);
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    Clear.render(rect, buf);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} wpm", stats.wpm), bold_style.fg(Color::Yellow)),
            Span::raw("   "),
            Span::styled(
                format!("{}% acc", stats.accuracy),
                bold_style.fg(Color::Green),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{}/{} correct in {:.1}s",
                stats.correct_chars,
                stats.typed_chars,
                stats.elapsed.as_secs_f64()
            ),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(tab) new round",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" round complete ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::Red)),
        )
        .render(rect, buf);
}
