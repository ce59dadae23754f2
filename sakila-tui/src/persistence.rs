//! The page the user was on, kept across restarts.

use crate::nav::View;
use crate::state::App;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Records are always fetched fresh, so only the active page is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub active_view: View,
}

impl PersistedState {
    pub fn capture(app: &App) -> Self {
        Self {
            active_view: app.active_view,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub fn load(path: &Path) -> Result<Option<PersistedState>, PersistenceError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let state = serde_json::from_str::<PersistedState>(&contents)?;
    Ok(Some(state))
}

pub fn save(path: &Path, state: &PersistedState) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(state)?;
    std::fs::write(path, contents)?;
    debug!(path = %path.display(), view = state.active_view.title(), "Saved UI state");
    Ok(())
}

/// Page to open on start, or `fallback` when nothing usable was saved.
pub fn restore_view(path: &Path, fallback: View) -> View {
    match load(path) {
        Ok(Some(state)) => state.active_view,
        Ok(None) => fallback,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Ignoring unreadable UI state");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ThemeConfig, TuiConfig};
    use sakila_test_utils::MockApi;
    use std::sync::Arc;

    fn app() -> App {
        let config = TuiConfig {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_ms: 1_000,
            persistence_path: "state.json".into(),
            log_path: "tui.log".into(),
            theme: ThemeConfig {
                name: "synthbrute".to_string(),
            },
        };
        App::new(config, Arc::new(MockApi::new()))
    }

    #[test]
    fn app_view_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui").join("state.json");
        let mut app = app();
        app.active_view = View::Films;

        save(&path, &PersistedState::capture(&app)).unwrap();
        assert_eq!(restore_view(&path, View::Home), View::Films);
    }

    #[test]
    fn restore_falls_back_without_usable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        assert_eq!(restore_view(&path, View::Customer), View::Customer);

        std::fs::write(&path, r#"{"active_view": "Checkout"}"#).unwrap();
        assert_eq!(restore_view(&path, View::Home), View::Home);
    }
}
