use axum::body::Bytes;
use axum::extract::Multipart;
use axum::response::Response;
use tracing::instrument;

use super::images::png_response;
use super::prelude::*;

/// Fields of the `/generate-meme` form we care about.
#[derive(Debug, Default)]
struct MemeForm {
    image: Option<Bytes>,
    tone: Option<String>,
    font_size: Option<String>,
    font_color: Option<String>,
    position: Option<String>,
}

async fn read_form(multipart: &mut Multipart) -> Result<MemeForm, MemeError> {
    let mut form = MemeForm::default();
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "image" => form.image = Some(field.bytes().await?),
            "tone" => form.tone = Some(field.text().await?),
            "font_size" => form.font_size = Some(field.text().await?),
            "font_color" => form.font_color = Some(field.text().await?),
            "position" => form.position = Some(field.text().await?),
            other => debug!("Ignoring form field {:?}", other),
        }
    }
    Ok(form)
}

/// handles POST /generate-meme
#[instrument(skip_all)]
pub(crate) async fn generate_meme_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, MemeError> {
    debug!("Received /generate-meme request");
    let form = read_form(&mut multipart).await?;
    let image_bytes = form
        .image
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| MemeError::BadRequest("No image provided.".to_string()))?;

    let style = StyleConfig::from_form(
        form.font_size.as_deref(),
        form.font_color.as_deref(),
        form.position.as_deref(),
        form.tone.as_deref(),
    );

    let decode_bytes = image_bytes.clone();
    let source = tokio::task::spawn_blocking(move || SourceImage::decode(&decode_bytes)).await??;
    debug!(
        "Image loaded successfully ({}x{})",
        source.pixels.width(),
        source.pixels.height()
    );

    let tone = prompts::resolve_tone(&style.tone_label, &state.tone_picker);
    let text = state
        .generator
        .generate(GenerationRequest {
            image: image_bytes.to_vec(),
            mime_type: source.mime_type().to_string(),
            prompt: prompts::meme_prompt(tone),
        })
        .await
        .map_err(|err| MemeError::Upstream(format!("{:#}", err)))?;
    info!("Meme text ({}): {:?}", tone, text);

    let renderer = state.renderer.clone();
    let meme = tokio::task::spawn_blocking(move || {
        renderer.render(&source.pixels, &text, &style)
    })
    .await??;

    png_response(meme.png)
}
