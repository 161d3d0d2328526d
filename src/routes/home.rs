//! Landing page with the submission form.

use axum::{extract::State, response::Html};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Render `index.html`.
#[instrument(name = "home::index", skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut context = tera::Context::new();
    context.insert(
        "max_upload_mb",
        &(state.config.submission.max_upload_bytes / (1024 * 1024)),
    );

    let html = state.tera.render("index.html", &context)?;
    Ok(Html(html))
}
