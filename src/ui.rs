use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::game::{Game, Level, Phase};
use crate::theme::Theme;

const HORIZONTAL_MARGIN: u16 = 5;
const ICONS_PER_ROW: usize = 4;
// Emoji are double-width cells; pad to four so columns line up
const CELL_WIDTH: usize = 4;

/// Seconds rendered as M:SS, zero-padded.
pub fn format_time(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl Widget for &Game {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.started {
            render_menu(self, area, buf);
            return;
        }
        match self.phase {
            Phase::Memorize => render_memorize(self, area, buf),
            Phase::TimeUp => render_time_up(area, buf),
            Phase::Recall => render_recall(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn option_span(label: String, selected: bool) -> Span<'static> {
    if selected {
        Span::styled(label, bold().fg(Color::Green))
    } else {
        Span::styled(label, dim())
    }
}

fn render_menu(game: &Game, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![
        Line::from(Span::styled("Welcome to Memory Blink!", bold())),
        Line::from(""),
        Line::from(Span::styled("SELECT A LEVEL", dim())),
        Line::from(vec![
            option_span("(e) Easy".into(), game.level == Some(Level::Easy)),
            Span::raw("   "),
            option_span("(m) Medium".into(), game.level == Some(Level::Medium)),
            Span::raw("   "),
            option_span("(h) Hard".into(), game.level == Some(Level::Hard)),
        ]),
        Line::from(""),
        Line::from(Span::styled("SELECT A THEME", dim())),
        Line::from(vec![
            option_span("(f) Fruits".into(), game.theme == Some(Theme::Fruits)),
            Span::raw("   "),
            option_span("(a) Animals".into(), game.theme == Some(Theme::Animals)),
            Span::raw("   "),
            option_span("(o) Objects".into(), game.theme == Some(Theme::Objects)),
        ]),
        Line::from(""),
    ];

    if game.is_ready() {
        lines.push(Line::from(Span::styled(
            "press enter to start",
            bold().fg(Color::Green),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "pick a level and a theme to begin",
            dim().add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("(esc) exit", dim())));

    render_centered(lines, area, buf);
}

fn render_memorize(game: &Game, area: Rect, buf: &mut Buffer) {
    let chunks = split_screen(area, 2);

    top_bar(game, Some(game.time_left), "(esc) quit").render(chunks[0], buf);

    let mut lines = vec![Line::from("")];
    lines.extend(board_lines(&game.items));
    render_centered(lines, chunks[1], buf);
}

fn render_time_up(area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled(
            "TIME'S UP",
            bold().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "the board is coming back with one icon missing...",
            dim().add_modifier(Modifier::ITALIC),
        )),
    ];
    render_centered(lines, area, buf);
}

fn render_recall(game: &Game, area: Rect, buf: &mut Buffer) {
    let chunks = split_screen(area, 2);

    top_bar(game, None, "(esc) quit").render(chunks[0], buf);

    let mut lines = vec![Line::from("")];
    if let Some(reveal) = &game.reveal {
        lines.extend(board_lines(&reveal.remaining));
    }
    lines.push(Line::from(Span::styled("Which icon vanished?", bold())));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("> ", dim()),
        Span::styled(game.answer.input.clone(), bold()),
        Span::styled("_", dim()),
    ]));
    lines.push(Line::from(""));

    if game.answer.checked {
        let verdict_style = if game.answer.result == "Correct!" {
            bold().fg(Color::Green)
        } else {
            bold().fg(Color::Red)
        };
        lines.push(Line::from(Span::styled(
            game.answer.result.clone(),
            verdict_style,
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("(enter) play again", dim())));
    } else {
        lines.push(Line::from(Span::styled("(enter) check", dim())));
    }

    render_centered(lines, chunks[1], buf);
}

/// Status line shown above a running round.
fn top_bar(game: &Game, time_left: Option<u64>, hint: &str) -> Paragraph<'static> {
    let level = game.level.map(|l| l.to_string()).unwrap_or_default();
    let theme = game.theme.map(|t| t.to_string()).unwrap_or_default();

    let mut spans = vec![
        Span::styled("Level: ", dim()),
        Span::styled(level, bold()),
        Span::raw("   "),
        Span::styled("Theme: ", dim()),
        Span::styled(theme, bold()),
    ];
    if let Some(secs) = time_left {
        let timer_style = if secs <= 5 {
            bold().fg(Color::Red)
        } else {
            bold()
        };
        spans.push(Span::raw("   "));
        spans.push(Span::styled(format_time(secs), timer_style));
    }
    spans.push(Span::raw("   "));
    spans.push(Span::styled(hint.to_string(), dim()));

    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

/// Icon grid, a handful per row, padded so the double-width emoji line up.
fn board_lines(icons: &[String]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for chunk in &icons.iter().chunks(ICONS_PER_ROW) {
        let row: String = chunk
            .map(|icon| {
                let pad = CELL_WIDTH.saturating_sub(icon.width());
                format!("{}{}", icon, " ".repeat(pad))
            })
            .collect();
        lines.push(Line::from(row.trim_end().to_string()));
        lines.push(Line::from(""));
    }
    lines
}

fn split_screen(area: Rect, bar_lines: u16) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(1)
        .constraints([Constraint::Length(bar_lines), Constraint::Min(1)].as_ref())
        .split(area)
}

fn render_centered(lines: Vec<Line<'static>>, area: Rect, buf: &mut Buffer) {
    let content_height = lines.len() as u16;
    let top = area.height.saturating_sub(content_height) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(top), Constraint::Min(1)].as_ref())
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .render(chunks[1], buf);
}
