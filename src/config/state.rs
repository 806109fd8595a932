// Application state module
// Owns the loaded configuration and the injected user store

use crate::store::UserStore;

use super::types::Config;

/// Shared application state, one instance per process behind an `Arc`.
///
/// The user store lives here rather than in module-level state so handlers
/// receive it explicitly and tests can build isolated instances.
pub struct AppState {
    pub config: Config,
    pub users: UserStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            users: UserStore::new(),
        }
    }
}
