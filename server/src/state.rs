//! Shared server state handed to the edge middleware.

use std::sync::Arc;

use session::EdgeRules;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub edge: Arc<EdgeRules>,
    /// `Secure` attribute on cookies the server writes.
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self { edge: Arc::new(EdgeRules::from_config(&config.session)), cookie_secure: config.cookie_secure }
    }
}
