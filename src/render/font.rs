//! Font loading and text measurement.
//!
//! The primary font comes from disk. When it can't be read or parsed we fall
//! back to the font compiled into the binary, and only give up if that fails too.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use tracing::{info, warn};

use super::RenderError;

static BUNDLED_FONT: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/static/fonts/DejaVuSans-Bold.ttf"
));

/// Where the active font came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// Loaded from this file.
    Primary(PathBuf),
    /// The font bundled with the binary.
    Bundled,
}

/// Pixel extent of a run of text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextExtent {
    /// Width of the inked bounding box, rounded up.
    pub width: u32,
    /// Height of the inked bounding box, rounded up.
    pub height: u32,
}

/// A parsed font, cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct MemeFont {
    font: FontArc,
    source: FontSource,
}

impl std::fmt::Debug for MemeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemeFont")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl MemeFont {
    /// Loads `primary`, falling back to the bundled font.
    pub fn load(primary: &Path) -> Result<Self, RenderError> {
        load_with_fallback(primary, BUNDLED_FONT)
    }

    /// The bundled font.
    pub fn bundled() -> Result<Self, RenderError> {
        parse_static(BUNDLED_FONT)
    }

    /// Where this font came from.
    pub fn source(&self) -> &FontSource {
        &self.source
    }

    pub(crate) fn inner(&self) -> &FontArc {
        &self.font
    }

    /// Pixel scale for a font size given in px per em.
    ///
    /// `PxScale` is the ascent-to-descent height, which is taller than the em
    /// square for most fonts.
    pub fn scale(&self, size_px: u32) -> PxScale {
        let size = size_px as f32;
        match self.font.units_per_em() {
            Some(units_per_em) if units_per_em > 0.0 => {
                PxScale::from(size * self.font.height_unscaled() / units_per_em)
            }
            _ => PxScale::from(size),
        }
    }

    /// Measures the ink of `text` as it would be drawn at `scale`.
    pub fn measure(&self, scale: PxScale, text: &str) -> TextExtent {
        let scaled = self.font.as_scaled(scale);
        let mut caret = 0.0f32;
        let mut previous: Option<GlyphId> = None;
        let (mut left, mut right) = (f32::MAX, f32::MIN);
        let (mut top, mut bottom) = (f32::MAX, f32::MIN);

        for c in text.chars() {
            let glyph_id = scaled.glyph_id(c);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, glyph_id);
            }
            let glyph = glyph_id.with_scale_and_position(scale, point(caret, scaled.ascent()));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                left = left.min(bounds.min.x);
                right = right.max(bounds.max.x);
                top = top.min(bounds.min.y);
                bottom = bottom.max(bounds.max.y);
            }
            caret += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);
        }

        if right <= left || bottom <= top {
            return TextExtent::default();
        }
        TextExtent {
            width: (right - left).ceil() as u32,
            height: (bottom - top).ceil() as u32,
        }
    }
}

fn load_with_fallback(primary: &Path, fallback: &'static [u8]) -> Result<MemeFont, RenderError> {
    match load_file(primary) {
        Ok(font) => {
            info!("Loaded font from {}", primary.display());
            Ok(font)
        }
        Err(err) => {
            warn!("{}, using bundled font", err);
            parse_static(fallback)
        }
    }
}

fn load_file(path: &Path) -> Result<MemeFont, RenderError> {
    let bytes = std::fs::read(path).map_err(|err| {
        RenderError::FontLoad(format!("Failed to read font {}: {}", path.display(), err))
    })?;
    let font = FontArc::try_from_vec(bytes).map_err(|err| {
        RenderError::FontLoad(format!("Failed to parse font {}: {}", path.display(), err))
    })?;
    Ok(MemeFont {
        font,
        source: FontSource::Primary(path.to_path_buf()),
    })
}

fn parse_static(bytes: &'static [u8]) -> Result<MemeFont, RenderError> {
    let font = FontArc::try_from_slice(bytes)
        .map_err(|err| RenderError::FontLoad(format!("Failed to parse bundled font: {}", err)))?;
    Ok(MemeFont {
        font,
        source: FontSource::Bundled,
    })
}
