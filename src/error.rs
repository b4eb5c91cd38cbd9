//! Error handling

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{error, info};

use crate::render::RenderError;

/// definitions for the memeforge application.
#[derive(Debug)]
pub enum MemeError {
    /// When you didn't do the right thing, with a message for the caller
    BadRequest(String),
    /// The text generator returned nothing usable
    NoTextGenerated(&'static str),
    /// The text generator failed
    Upstream(String),
    /// Rendering failed
    Render(RenderError),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl From<RenderError> for MemeError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::ImageDecode(_) | RenderError::InvalidImage { .. } => {
                MemeError::BadRequest(err.to_string())
            }
            RenderError::EmptyText => MemeError::NoTextGenerated("No meme text generated."),
            other => MemeError::Render(other),
        }
    }
}

impl From<std::io::Error> for MemeError {
    fn from(err: std::io::Error) -> Self {
        MemeError::InternalServerError(err.to_string())
    }
}

impl From<axum::http::Error> for MemeError {
    fn from(err: axum::http::Error) -> Self {
        MemeError::InternalServerError(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for MemeError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        MemeError::BadRequest(err.body_text())
    }
}

impl From<tokio::task::JoinError> for MemeError {
    fn from(err: tokio::task::JoinError) -> Self {
        MemeError::InternalServerError(err.to_string())
    }
}

impl MemeError {
    /// Logs the error and returns the status and the message safe to show the caller.
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            MemeError::BadRequest(message) => {
                info!("Bad request received: {}", message);
                (StatusCode::BAD_REQUEST, message)
            }
            MemeError::NoTextGenerated(message) => {
                error!("{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            MemeError::Upstream(message) => {
                error!("Text generation failed: {}", message);
                (
                    StatusCode::BAD_GATEWAY,
                    "Text generation failed, try again later.".to_string(),
                )
            }
            MemeError::Render(err) => {
                error!("Render error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            MemeError::InternalServerError(message) => {
                error!("Internal server error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for MemeError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = self.status_and_message();
        let mut response = axum::response::Response::new(axum::body::Body::from(message));
        *response.status_mut() = status;
        response
    }
}

/// A [`MemeError`] rendered as `{"error": "..."}` for JSON endpoints.
#[derive(Debug)]
pub struct JsonError(pub MemeError);

impl From<MemeError> for JsonError {
    fn from(err: MemeError) -> Self {
        JsonError(err)
    }
}

impl From<JsonRejection> for JsonError {
    fn from(rejection: JsonRejection) -> Self {
        JsonError(MemeError::BadRequest(rejection.body_text()))
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = self.0.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
