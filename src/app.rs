use axum::{routing::get, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::routes::{page_routes, submit_routes};
use crate::state::app::AppState;

/// Build the complete Axum application:
/// - `/`, `/message`   (fixed pages)
/// - `/about_me`       (template page)
/// - anything else     (static assets, else the 404 page)
/// - POST on any path  (submission relay)
///
/// The named routes carry the POST handler too, so the relay really does
/// cover every path; everything unrouted lands in the fallback.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(page_routes::index).post(submit_routes::relay_submission),
        )
        .route(
            "/message",
            get(page_routes::message_page).post(submit_routes::relay_submission),
        )
        .route(
            "/about_me",
            get(page_routes::about_page).post(submit_routes::relay_submission),
        )
        .fallback(page_routes::fallback)
        // Logging middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
