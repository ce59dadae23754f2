//! View rendering dispatch.

pub mod customer;
pub mod films;
pub mod home;
pub mod modal;

use crate::keys::InputMode;
use crate::nav::View;
use crate::state::App;
use crate::theme::notification_color;
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.active_view {
        View::Home => home::render(f, app, layout[1]),
        View::Films => films::render(f, app, layout[1]),
        View::Customer => customer::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);
    modal::render(f, app);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let titles: Vec<Line> = View::all()
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!("{} {}", i + 1, view.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.active_view.index())
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border(false))
                .title("Sakila"),
        );
    f.render_widget(tabs, area);
}

fn footer_help(app: &App) -> &'static str {
    if app.alert.is_some() {
        return "Enter/Esc dismiss";
    }
    if app.input_mode() == InputMode::Text {
        return if app.search_input.is_some() {
            "type query • Tab category • Enter search • Esc cancel"
        } else {
            "type • Tab/↑↓ field • Enter submit • Esc cancel"
        };
    }
    match app.active_view {
        View::Home => "j/k move • h/l switch list • Enter expand • Tab page • q quit",
        View::Films => "/ search • c category • x clear • Enter details • r rent • q quit",
        View::Customer => {
            "/ search • c category • x clear • h/l page • Enter details • n new • e edit • d delete • q quit"
        }
    }
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let now = Utc::now();
    let (text, style) = match app.notifications.last().filter(|n| n.is_fresh(now)) {
        Some(note) => (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        ),
        None => (
            footer_help(app).to_string(),
            Style::default().fg(app.theme.text_dim),
        ),
    };
    let footer = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border(false)),
        )
        .style(style);
    f.render_widget(footer, area);
}

/// A rectangle of the given percentage size centred in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
