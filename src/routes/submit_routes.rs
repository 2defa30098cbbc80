use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::net::UdpSocket;

use crate::state::app::AppState;

//
// ─────────────────────────────────────────────────────────────
// POST /<any-path>
// Relay the raw body to the receiver, bounce the client to /
// ─────────────────────────────────────────────────────────────
//
pub async fn relay_submission(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Chunked bodies are not supported; a POST without Content-Length is
    // refused rather than read blind.
    if !headers.contains_key(header::CONTENT_LENGTH) {
        return (StatusCode::BAD_REQUEST, "Content-Length required").into_response();
    }

    if let Err(e) = send_datagram(&body, state.config.socket_addr).await {
        tracing::error!("Relay to {} failed: {e}", state.config.socket_addr);
    }

    // Fire-and-forget: the client is redirected whether or not the datagram
    // made it anywhere.
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

/// One ephemeral socket per submission, a connectionless one-shot client.
async fn send_datagram(payload: &[u8], target: SocketAddr) -> std::io::Result<()> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.send_to(payload, target).await?;

    Ok(())
}
