use std::fs;

use serde_json::Value;
use tera::Context;

use crate::errors::SiteError;
use crate::state::app::AppState;

/// Render the about page.
///
/// The side JSON document is read fresh on every request and handed to the
/// template under the `blogs` key; the template environment itself is loaded
/// once at startup.
pub fn render_about(state: &AppState) -> Result<String, SiteError> {
    let data = fs::read_to_string(&state.config.about_data_file)?;
    let blogs: Value = serde_json::from_str(&data)?;

    let mut context = Context::new();
    context.insert("blogs", &blogs);

    Ok(state.templates.render(&state.config.about_template, &context)?)
}
