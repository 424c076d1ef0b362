use std::sync::Arc;

use crate::{attempt::session::SessionStore, config::Config, store::SqliteStore};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub store: SqliteStore,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Config,
}

impl FromRef<AppState> for SqliteStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<dyn SessionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
