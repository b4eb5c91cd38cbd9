use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;

use crate::constants::PNG_CONTENT_TYPE;
use crate::error::MemeError;

/// Generated memes are one-offs, don't let anything cache them.
const MEME_CACHE_CONTROL: &str = "no-store";

/// Builds the `image/png` response for a rendered meme.
pub(crate) fn png_response(png: Vec<u8>) -> Result<Response, MemeError> {
    let length = HeaderValue::from(png.len());
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, PNG_CONTENT_TYPE)
        .header(CACHE_CONTROL, MEME_CACHE_CONTROL)
        .header(CONTENT_LENGTH, length)
        .body(Body::from(png))
        .map_err(MemeError::from)
}
