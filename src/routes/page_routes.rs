use std::path::Path;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tokio::fs;

use crate::errors::SiteError;
use crate::routes::submit_routes;
use crate::services::render_service;
use crate::state::app::AppState;

//
// ─────────────────────────────────────────────────────────────
// GET /
// Fixed index page
// ─────────────────────────────────────────────────────────────
//
pub async fn index(State(state): State<AppState>) -> Response {
    serve_html(&state.config.index_file, StatusCode::OK).await
}

//
// ─────────────────────────────────────────────────────────────
// GET /message
// Contact form page
// ─────────────────────────────────────────────────────────────
//
pub async fn message_page(State(state): State<AppState>) -> Response {
    serve_html(&state.config.message_file, StatusCode::OK).await
}

//
// ─────────────────────────────────────────────────────────────
// GET /about_me
// Template page fed from the side JSON document
// ─────────────────────────────────────────────────────────────
//
pub async fn about_page(State(state): State<AppState>) -> Result<Response, SiteError> {
    let html = render_service::render_about(&state)?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "text/html")], html).into_response())
}

//
// ─────────────────────────────────────────────────────────────
// Fallback for everything unrouted
// GET: static asset or the 404 page. POST: relay from any path.
// ─────────────────────────────────────────────────────────────
//
pub async fn fallback(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::GET {
        serve_static(&state, uri.path()).await
    } else if method == Method::POST {
        submit_routes::relay_submission(State(state), headers, body).await
    } else {
        StatusCode::METHOD_NOT_ALLOWED.into_response()
    }
}

/// Serve a whole HTML file with the given status. An unreadable page file is
/// answered with a 500 and logged instead of tearing the connection down.
async fn serve_html(path: &Path, status: StatusCode) -> Response {
    match fs::read(path).await {
        Ok(body) => (status, [(header::CONTENT_TYPE, "text/html")], body).into_response(),
        Err(e) => {
            tracing::error!("Cannot read page {}: {e}", path.display());
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Resolve the request path against the static root and serve the file bytes
/// whole, with the content type guessed from the extension.
///
/// Resolution is purely lexical: the leading slash is stripped and the rest
/// joined as-is, with no percent-decoding and no `..` normalization, so a
/// crafted path can name files outside the static root. Known weakness,
/// inherited behavior.
async fn serve_static(state: &AppState, request_path: &str) -> Response {
    let relative = request_path.trim_start_matches('/');
    let path = state.config.static_root.join(relative);

    if !path.is_file() {
        return serve_html(&state.config.error_file, StatusCode::NOT_FOUND).await;
    }

    let content_type = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or("text/plain");

    match fs::read(&path).await {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => {
            tracing::error!("Cannot read static file {}: {e}", path.display());
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
