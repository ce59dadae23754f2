use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use proptest::prelude::*;
use sakila_core::{HomeState, Record};
use sakila_test_utils::{actor_film_row, top_actor_row, top_film_row, Endpoint, MockApi};
use sakila_tui::config::{config_path_from_args, ConfigError, ThemeConfig, TuiConfig};
use sakila_tui::keys::{map_key, Action, InputMode};
use sakila_tui::nav::View;
use sakila_tui::persistence::{self, PersistedState};
use std::io::Write;

fn base_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://127.0.0.1:5000".to_string(),
        request_timeout_ms: 5_000,
        persistence_path: "tmp/sakila-tui.json".into(),
        log_path: "tmp/sakila-tui.log".into(),
        theme: ThemeConfig {
            name: "synthbrute".to_string(),
        },
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn config_accepts_base() {
    assert!(base_config().validate().is_ok());
}

#[test]
fn config_requires_theme_name() {
    let mut config = base_config();
    config.theme = ThemeConfig {
        name: "unknown".to_string(),
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { field: "theme.name", .. })
    ));
}

#[test]
fn config_rejects_zero_timeout() {
    let mut config = base_config();
    config.request_timeout_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn config_rejects_non_http_base_url() {
    let mut config = base_config();
    config.api_base_url = "127.0.0.1:5000".to_string();
    assert!(config.validate().is_err());
    config.api_base_url = "   ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn config_loads_from_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
api_base_url = "http://localhost:5000/"
request_timeout_ms = 2500
persistence_path = "state/tui.json"
log_path = "state/tui.log"

[theme]
name = "SynthBrute"
"#
    )
    .unwrap();

    let config = TuiConfig::from_path(file.path()).unwrap();
    assert_eq!(config.request_timeout_ms, 2500);
    assert!(config.validate().is_ok());
}

#[test]
fn config_rejects_unknown_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
api_base_url = "http://localhost:5000"
request_timeout_ms = 2500
persistence_path = "state/tui.json"
log_path = "state/tui.log"
retries = 3

[theme]
name = "synthbrute"
"#
    )
    .unwrap();

    assert!(matches!(
        TuiConfig::from_path(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn config_path_flag_forms() {
    let args = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    assert_eq!(
        config_path_from_args(args(&["--config", "a.toml"])),
        Some("a.toml".into())
    );
    assert_eq!(
        config_path_from_args(args(&["--config=b.toml"])),
        Some("b.toml".into())
    );
    assert_eq!(config_path_from_args(args(&["--verbose"])), None);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn persisted_view_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");
    assert!(persistence::load(&path).unwrap().is_none());

    let state = PersistedState {
        active_view: View::Customer,
    };
    persistence::save(&path, &state).unwrap();
    assert_eq!(persistence::load(&path).unwrap(), Some(state));
}

#[test]
fn corrupt_state_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(persistence::load(&path).is_err());
}

// ============================================================================
// Home page
// ============================================================================

#[tokio::test]
async fn home_loads_both_lists_independently() {
    let api = MockApi::new();
    api.set_top_movies(vec![
        top_film_row(103, "BUCKET BROTHERHOOD", 34),
        top_film_row(738, "ROCKETEER MOTHER", 33),
    ]);
    api.fail(
        Endpoint::TopActors,
        sakila_core::ApiError::server(500, "actors unavailable"),
    );

    let mut home = HomeState::new();
    let err = home.load(&api).await.unwrap_err();
    assert_eq!(err.to_string(), "actors unavailable");
    assert_eq!(home.top_films.len(), 2);
    assert!(home.top_actors.is_empty());
}

#[tokio::test]
async fn switching_actor_replaces_film_list() {
    let api = MockApi::new();
    api.set_top_actors(vec![
        top_actor_row(107, "GINA", "DEGENERES"),
        top_actor_row(102, "WALTER", "TORN"),
    ]);
    api.set_actor_movies(107, vec![actor_film_row(1, "ACADEMY DINOSAUR", 20)]);
    api.set_actor_movies(
        102,
        vec![
            actor_film_row(2, "ACE GOLDFINGER", 12),
            actor_film_row(3, "ADAPTATION HOLES", 9),
        ],
    );
    let mut home = HomeState::new();
    home.load(&api).await.unwrap();

    home.toggle_actor(&api, 0).await.unwrap();
    assert_eq!(home.actor_films.len(), 1);
    home.toggle_actor(&api, 1).await.unwrap();
    assert_eq!(home.actor_films.len(), 2);
    assert_eq!(
        home.selected_actor_record().map(|a: &Record| a.text(2)),
        Some("TORN".to_string())
    );

    api.fail(
        Endpoint::TopActorMovies,
        sakila_core::ApiError::Transport("reset".to_string()),
    );
    assert!(home.toggle_actor(&api, 0).await.is_err());
    assert_eq!(home.actor_films.len(), 2);
    assert_eq!(home.selected_actor.map(|id| id.to_string()), Some("102".to_string()));
}

// ============================================================================
// Keybindings
// ============================================================================

#[test]
fn text_mode_sends_letters_to_input() {
    for c in ['q', 'n', 'e', 'd', '/', '1'] {
        assert_eq!(
            map_key(key(KeyCode::Char(c)), InputMode::Text),
            Some(Action::Input(c))
        );
    }
    assert_eq!(
        map_key(key(KeyCode::Enter), InputMode::Text),
        Some(Action::Confirm)
    );
}

#[test]
fn ctrl_c_quits_in_every_mode() {
    let mut event = key(KeyCode::Char('c'));
    event.modifiers = KeyModifiers::CONTROL;
    assert_eq!(map_key(event, InputMode::Text), Some(Action::Quit));
    assert_eq!(map_key(event, InputMode::Navigate), Some(Action::Quit));
}

#[test]
fn key_release_is_ignored() {
    let mut event = key(KeyCode::Char('q'));
    event.kind = KeyEventKind::Release;
    assert_eq!(map_key(event, InputMode::Navigate), None);
}

fn arb_view() -> impl Strategy<Value = View> {
    prop_oneof![Just(View::Home), Just(View::Films), Just(View::Customer)]
}

proptest! {
    #[test]
    fn keybinding_digit_switches_view(digit in 0u8..=9u8) {
        let ch = char::from(b'0' + digit);
        let action = map_key(key(KeyCode::Char(ch)), InputMode::Navigate);
        match ch {
            '1' => prop_assert_eq!(action, Some(Action::SwitchView(0))),
            '2' => prop_assert_eq!(action, Some(Action::SwitchView(1))),
            '3' => prop_assert_eq!(action, Some(Action::SwitchView(2))),
            _ => prop_assert!(action.is_none()),
        }
    }

    #[test]
    fn switch_view_indices_resolve(digit in 1u8..=3u8) {
        let ch = char::from(b'0' + digit);
        if let Some(Action::SwitchView(index)) = map_key(key(KeyCode::Char(ch)), InputMode::Navigate) {
            prop_assert!(View::from_index(index).is_some());
        } else {
            prop_assert!(false, "digit {} did not map to a view", ch);
        }
    }

    #[test]
    fn printable_chars_never_navigate_in_text_mode(c in proptest::char::range('!', '~')) {
        let action = map_key(key(KeyCode::Char(c)), InputMode::Text);
        prop_assert_eq!(action, Some(Action::Input(c)));
    }

    #[test]
    fn view_next_previous_inverse(view in arb_view()) {
        prop_assert_eq!(view.next().previous(), view);
        prop_assert_eq!(view.previous().next(), view);
        prop_assert_eq!(View::from_index(view.index()), Some(view));
    }
}
