//! Home page: top rented films and top actors side by side.

use crate::state::App;
use crate::widgets::DetailPanel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use sakila_core::home::{actor_film, top_actor, top_film};
use sakila_core::{HomePanel, HomeState};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_films(f, app, columns[0]);
    render_actors(f, app, columns[1]);
}

fn render_films(f: &mut Frame<'_>, app: &App, area: Rect) {
    let home = &app.home;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    let items: Vec<ListItem> = home
        .top_films
        .iter()
        .map(|film| {
            ListItem::new(format!(
                "{} ({} rentals)",
                film.text(top_film::TITLE),
                film.text(top_film::RENTAL_COUNT)
            ))
        })
        .collect();
    let focused = home.focus == HomePanel::Films;
    let mut state = ListState::default();
    state.select(home.film_cursor);
    let list = List::new(items)
        .block(
            Block::default()
                .title("Top 5 Rented Films")
                .borders(Borders::ALL)
                .border_style(app.theme.border(focused)),
        )
        .highlight_style(app.theme.highlight());
    f.render_stateful_widget(list, chunks[0], &mut state);

    let fields = home
        .expanded_film_record()
        .map(|film| {
            vec![
                ("Title", film.text(top_film::TITLE)),
                ("Description", film.text(top_film::DESCRIPTION)),
                ("Release Year", film.text(top_film::RELEASE_YEAR)),
                ("Rental Rate", format!("${}", film.text(top_film::RENTAL_RATE))),
                ("Rental Count", film.text(top_film::RENTAL_COUNT)),
            ]
        })
        .unwrap_or_default();
    DetailPanel {
        title: "Film Details",
        fields,
        label_style: Style::default().fg(app.theme.secondary),
        border_style: app.theme.border(false),
    }
    .render(f, chunks[1]);
}

fn render_actors(f: &mut Frame<'_>, app: &App, area: Rect) {
    let home = &app.home;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    let items: Vec<ListItem> = home
        .top_actors
        .iter()
        .map(|actor| {
            let selected =
                home.selected_actor.is_some() && HomeState::actor_id(actor) == home.selected_actor;
            let marker = if selected { "* " } else { "  " };
            ListItem::new(format!(
                "{}{} {}",
                marker,
                actor.text(top_actor::FIRST_NAME),
                actor.text(top_actor::LAST_NAME)
            ))
        })
        .collect();
    let focused = home.focus == HomePanel::Actors;
    let mut state = ListState::default();
    state.select(home.actor_cursor);
    let list = List::new(items)
        .block(
            Block::default()
                .title("Top 5 Actors")
                .borders(Borders::ALL)
                .border_style(app.theme.border(focused)),
        )
        .highlight_style(app.theme.highlight());
    f.render_stateful_widget(list, chunks[0], &mut state);

    let title = match home.selected_actor_record() {
        Some(actor) => format!(
            "Top Films: {} {}",
            actor.text(top_actor::FIRST_NAME),
            actor.text(top_actor::LAST_NAME)
        ),
        None => "Top Films".to_string(),
    };
    let films: Vec<ListItem> = home
        .actor_films
        .iter()
        .map(|film| {
            ListItem::new(format!(
                "{} ({} rentals)",
                film.text(actor_film::TITLE),
                film.text(actor_film::RENTAL_COUNT)
            ))
        })
        .collect();
    let list = List::new(films).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(app.theme.border(false)),
    );
    f.render_widget(list, chunks[1]);
}
