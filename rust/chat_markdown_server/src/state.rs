//! Application state shared across handlers.

use crate::ServerConfig;

/// Immutable for the life of the process.
pub(crate) struct AppState {
    pub config: ServerConfig,
}
