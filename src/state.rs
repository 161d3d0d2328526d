//! Shared application state for request handlers.

use std::sync::Arc;
use tera::Tera;

use crate::config::AppConfig;
use crate::mailer::Mailer;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration, the Tera template engine (used for
/// both the landing page and the confirmation email), and the mailer that
/// delivers confirmations.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Creates a new application state from the given configuration, templates, and mailer.
    pub fn new(config: AppConfig, tera: Tera, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            mailer,
        }
    }
}
