//! Films page: search bar, result cards, inline details.

use crate::state::App;
use crate::widgets::{CategoryOption, DetailPanel, SearchBar};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use sakila_core::{FilmCategory, Record, SearchCategory};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_search(f, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    render_results(f, app, body[0]);
    render_detail(f, app, body[1]);
}

fn render_search(f: &mut Frame<'_>, app: &App, area: Rect) {
    let search = &app.films.search;
    let categories = FilmCategory::all()
        .iter()
        .map(|c| CategoryOption {
            label: c.label(),
            active: *c == search.category,
        })
        .collect();
    let query = app.search_input.as_deref().unwrap_or(&search.query);
    SearchBar {
        title: "Search for a Film",
        categories,
        query,
        editing: app.search_input.is_some(),
        active_style: Style::default().fg(app.theme.primary),
        inactive_style: Style::default().fg(app.theme.text_dim),
        border_style: app.theme.border(app.search_input.is_some()),
    }
    .render(f, area);
}

fn card(film: &Record, category: FilmCategory, expanded: bool) -> ListItem<'static> {
    let marker = if expanded { "▾ " } else { "▸ " };
    let mut lines = vec![
        Line::from(format!("{}{}", marker, film.text("title"))),
        Line::from(format!("   Genre(s): {}", film.text("genre"))),
    ];
    if category == FilmCategory::Actor {
        lines.push(Line::from(format!("   Actor: {}", film.text("actor_name"))));
    }
    ListItem::new(lines)
}

fn render_results(f: &mut Frame<'_>, app: &App, area: Rect) {
    let films = &app.films;
    let block = Block::default()
        .title(format!("Films ({})", films.visible().len()))
        .borders(Borders::ALL)
        .border_style(app.theme.border(app.search_input.is_none()));

    if films.visible().is_empty() {
        let message = if films.search.searched {
            "No films found."
        } else {
            "Press / to search by title, actor or genre."
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(app.theme.text_dim),
        )))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let expanded = films.selection.expanded();
    let items: Vec<ListItem> = films
        .visible()
        .iter()
        .map(|film| {
            let is_expanded = expanded.is_some() && films.record_id(film) == expanded;
            card(film, films.search.category, is_expanded)
        })
        .collect();
    let mut state = ListState::default();
    state.select(films.cursor);
    let list = List::new(items)
        .block(block)
        .highlight_style(app.theme.highlight());
    f.render_stateful_widget(list, area, &mut state);
}

fn render_detail(f: &mut Frame<'_>, app: &App, area: Rect) {
    let fields = app
        .films
        .expanded_record()
        .map(|film| {
            vec![
                ("Title", film.text("title")),
                ("Release Year", film.text("release_year")),
                ("Rental Rate", format!("${}", film.text("rental_rate"))),
                ("Description", film.text("description")),
            ]
        })
        .unwrap_or_default();
    DetailPanel {
        title: "Details [r rent]",
        fields,
        label_style: Style::default().fg(app.theme.secondary),
        border_style: app.theme.border(false),
    }
    .render(f, area);
}
