use axum::extract::FromRef;
use storage::Database;

use crate::auth::TokenKeys;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: TokenKeys,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
