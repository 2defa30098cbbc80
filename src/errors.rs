use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("malformed submission payload: {reason}")]
    Payload { reason: String },

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = match self {
            SiteError::Payload { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!("request failed: {self}");

        (status, self.to_string()).into_response()
    }
}
