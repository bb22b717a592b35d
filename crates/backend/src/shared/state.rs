use std::path::PathBuf;
use std::sync::Arc;

use super::config::{resolve_path, Config};
use crate::store::{SharedStore, Store};
use crate::system::auth::jwt::JwtKeys;

/// Shared by every handler through axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub jwt: Arc<JwtKeys>,
    pub uploads_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(config: &Config, store: Store) -> Self {
        Self {
            store: store.into_shared(),
            jwt: Arc::new(JwtKeys::new(
                &config.auth.jwt_secret,
                config.auth.token_lifetime_hours,
            )),
            uploads_dir: Arc::new(resolve_path(&config.uploads.dir)),
        }
    }
}
