use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use paste_core::PasteError;

/// Message used for both unknown names and wrong credentials, so a
/// response never reveals whether a name is taken.
pub const WRONG_CREDENTIALS: &str = "wrong credentials";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid request: {message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Paste(#[from] PasteError),

    #[error("record store error: {0}")]
    Records(#[from] paste_store::RecordError),

    #[error("blob store error: {0}")]
    Blobs(#[from] paste_blob::BlobError),

    #[error("hashing error: {0}")]
    Crypto(#[from] paste_crypto::CryptoError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ServerError {
    /// Status code and client-facing message.
    ///
    /// Backend failures are reported generically; their detail goes to
    /// the log only.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Rejected { status, message } => {
                let status = if *status == StatusCode::PAYLOAD_TOO_LARGE {
                    *status
                } else {
                    StatusCode::BAD_REQUEST
                };
                (status, message.clone())
            }
            Self::Paste(PasteError::InvalidName(e)) => {
                (StatusCode::BAD_REQUEST, format!("invalid name: {e}"))
            }
            Self::Paste(PasteError::Conflict { .. }) => {
                (StatusCode::BAD_REQUEST, "this name already exists".into())
            }
            Self::Paste(PasteError::NotFound { .. } | PasteError::AuthFailure) => {
                (StatusCode::BAD_REQUEST, WRONG_CREDENTIALS.into())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".into(),
            ),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
