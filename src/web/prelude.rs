pub(crate) use crate::error::MemeError;
pub(crate) use crate::genai::GenerationRequest;
pub(crate) use crate::prompts;
pub(crate) use crate::render::{SourceImage, StyleConfig};
pub(crate) use crate::web::AppState;
pub(crate) use axum::extract::State;
pub(crate) use serde::Deserialize;
pub(crate) use tracing::{debug, info};
