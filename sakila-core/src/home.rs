//! Home page: top rented films and top actors.
//!
//! The home endpoints return positional rows rather than objects; the
//! column constants below name the positions read from them.

use crate::api::SakilaApi;
use crate::error::ApiResult;
use crate::ids::{ActorId, FilmId, RecordId};
use crate::record::Record;
use tracing::{debug, warn};

/// `GET /top5movies` rows.
pub mod top_film {
    pub const FILM_ID: usize = 0;
    pub const TITLE: usize = 1;
    pub const RENTAL_COUNT: usize = 2;
    pub const DESCRIPTION: usize = 3;
    pub const RELEASE_YEAR: usize = 4;
    pub const RENTAL_RATE: usize = 5;
}

/// `GET /top5actors` rows.
pub mod top_actor {
    pub const ACTOR_ID: usize = 0;
    pub const FIRST_NAME: usize = 1;
    pub const LAST_NAME: usize = 2;
}

/// `GET /top5actors_movies` rows.
pub mod actor_film {
    pub const FILM_ID: usize = 0;
    pub const TITLE: usize = 1;
    pub const RENTAL_COUNT: usize = 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomePanel {
    #[default]
    Films,
    Actors,
}

#[derive(Debug, Clone, Default)]
pub struct HomeState {
    pub top_films: Vec<Record>,
    pub top_actors: Vec<Record>,
    pub expanded_film: Option<FilmId>,
    pub selected_actor: Option<ActorId>,
    pub actor_films: Vec<Record>,
    pub focus: HomePanel,
    pub film_cursor: Option<usize>,
    pub actor_cursor: Option<usize>,
}

impl HomeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch both top-5 lists. Each list is applied independently, so one
    /// failing endpoint does not blank the other; the first error is returned.
    pub async fn load(&mut self, api: &dyn SakilaApi) -> ApiResult<()> {
        let films = api.top_movies().await;
        let actors = api.top_actors().await;

        let mut first_error = None;
        match films {
            Ok(films) => {
                debug!(count = films.len(), "Top films loaded");
                self.film_cursor = if films.is_empty() { None } else { Some(0) };
                self.top_films = films;
            }
            Err(err) => {
                warn!(error = %err, "Top films fetch failed");
                first_error = Some(err);
            }
        }
        match actors {
            Ok(actors) => {
                debug!(count = actors.len(), "Top actors loaded");
                self.actor_cursor = if actors.is_empty() { None } else { Some(0) };
                self.top_actors = actors;
            }
            Err(err) => {
                warn!(error = %err, "Top actors fetch failed");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn film_id(film: &Record) -> Option<FilmId> {
        film.id(top_film::FILM_ID)
    }

    pub fn actor_id(actor: &Record) -> Option<ActorId> {
        actor.id(top_actor::ACTOR_ID)
    }

    /// Expand or collapse a top film's details. No request is made.
    pub fn toggle_film(&mut self, index: usize) {
        let Some(id) = self.top_films.get(index).and_then(Self::film_id) else {
            return;
        };
        self.expanded_film = if self.expanded_film == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    /// Select an actor and load their top films; selecting the same actor
    /// again collapses it and clears the list.
    pub async fn toggle_actor(&mut self, api: &dyn SakilaApi, index: usize) -> ApiResult<()> {
        let Some(id) = self.top_actors.get(index).and_then(Self::actor_id) else {
            return Ok(());
        };
        if self.selected_actor == Some(id) {
            self.selected_actor = None;
            self.actor_films.clear();
            return Ok(());
        }

        let films = api.top_actor_movies(id).await.inspect_err(|err| {
            warn!(actor_id = id.get(), error = %err, "Actor films fetch failed");
        })?;
        self.selected_actor = Some(id);
        self.actor_films = films;
        Ok(())
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            HomePanel::Films => HomePanel::Actors,
            HomePanel::Actors => HomePanel::Films,
        };
    }

    pub fn move_cursor(&mut self, forward: bool) {
        let (len, cursor) = match self.focus {
            HomePanel::Films => (self.top_films.len(), &mut self.film_cursor),
            HomePanel::Actors => (self.top_actors.len(), &mut self.actor_cursor),
        };
        if len == 0 {
            *cursor = None;
            return;
        }
        *cursor = Some(match (*cursor, forward) {
            (Some(i), true) if i < len => (i + 1) % len,
            (Some(i), false) if i > 0 && i < len => i - 1,
            (_, true) => 0,
            (_, false) => len - 1,
        });
    }

    pub fn expanded_film_record(&self) -> Option<&Record> {
        let id = self.expanded_film?;
        self.top_films
            .iter()
            .find(|f| Self::film_id(f) == Some(id))
    }

    pub fn selected_actor_record(&self) -> Option<&Record> {
        let id = self.selected_actor?;
        self.top_actors
            .iter()
            .find(|a| Self::actor_id(a) == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_films() -> HomeState {
        let mut state = HomeState::new();
        state.top_films = vec![
            Record::new(json!([103, "BUCKET BROTHERHOOD", 34, "A Amazing Display", 2006, 4.99])),
            Record::new(json!([738, "ROCKETEER MOTHER", 33, "A Awe-Inspiring Character Study", 2006, 0.99])),
        ];
        state.top_actors = vec![Record::new(json!([107, "GINA", "DEGENERES"]))];
        state
    }

    #[test]
    fn toggle_film_expands_then_collapses() {
        let mut state = with_films();
        state.toggle_film(1);
        assert_eq!(state.expanded_film, Some(FilmId::new(738)));
        assert_eq!(
            state.expanded_film_record().map(|f| f.text(top_film::TITLE)),
            Some("ROCKETEER MOTHER".to_string())
        );
        state.toggle_film(0);
        assert_eq!(state.expanded_film, Some(FilmId::new(103)));
        state.toggle_film(0);
        assert_eq!(state.expanded_film, None);
    }

    #[test]
    fn toggle_film_out_of_range_is_noop() {
        let mut state = with_films();
        state.toggle_film(9);
        assert_eq!(state.expanded_film, None);
    }

    #[test]
    fn cursor_follows_focused_panel() {
        let mut state = with_films();
        state.move_cursor(true);
        assert_eq!(state.film_cursor, Some(0));
        state.move_cursor(true);
        assert_eq!(state.film_cursor, Some(1));
        state.move_cursor(true);
        assert_eq!(state.film_cursor, Some(0));

        state.toggle_focus();
        state.move_cursor(false);
        assert_eq!(state.actor_cursor, Some(0));
        assert_eq!(state.film_cursor, Some(0));
    }
}
