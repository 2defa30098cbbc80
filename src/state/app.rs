use std::sync::Arc;

use tera::Tera;

use crate::config::AppConfig;
use crate::errors::SiteError;

/// Read-only application state shared across request handlers.
///
/// The template environment is built once at startup; the page data it is fed
/// with is read per request. There is no shared mutable state: the submission
/// store belongs to the receiver task alone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, SiteError> {
        let templates = Tera::new(&format!("{}/**/*.html", config.templates_dir))?;

        Ok(Self {
            config: Arc::new(config),
            templates: Arc::new(templates),
        })
    }
}
