use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds configuration only; requests share no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}
