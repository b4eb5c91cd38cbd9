use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use tracing::debug;

use super::RenderError;

/// A decoded upload, ready to be captioned.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// RGB pixels.
    pub pixels: RgbImage,
    /// Format sniffed from the bytes, if recognised.
    pub format: Option<ImageFormat>,
}

impl SourceImage {
    /// Decodes JPEG/PNG bytes into RGB, rejecting empty or degenerate images.
    pub fn decode(bytes: &[u8]) -> Result<Self, RenderError> {
        if bytes.len() < 4 {
            debug!("Image is too short");
            return Err(RenderError::ImageDecode("image data is too short".to_string()));
        }

        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|err| {
                debug!("Failed to guess image format: {}", err);
                RenderError::ImageDecode(err.to_string())
            })?;
        let format = reader.format();
        let image = reader.decode().map_err(|err| {
            debug!("Failed to decode image: {}", err);
            RenderError::ImageDecode(err.to_string())
        })?;

        let pixels = image.to_rgb8();
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(RenderError::InvalidImage {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        Ok(Self { pixels, format })
    }

    /// MIME type to send along with the original bytes.
    pub fn mime_type(&self) -> &'static str {
        self.format
            .map(|format| format.to_mime_type())
            .unwrap_or("image/jpeg")
    }
}
