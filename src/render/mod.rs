//! Meme compositing
//!
//! Caption text is upper-cased, wrapped to the image width and drawn with a
//! black halo onto a black banner that sits above or below the source image.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use ab_glyph::PxScale;
use image::{ImageFormat, Rgb, RgbImage, imageops};
use imageproc::drawing::draw_text_mut;
use tracing::{debug, instrument};

pub mod font;
pub mod layout;
mod source;
pub mod style;

pub use font::{FontSource, MemeFont};
pub use layout::TextLayout;
pub use source::SourceImage;
pub use style::{Position, StyleConfig};

use crate::constants::LINE_SPACING;
use layout::centered_x;

/// Banner and outline color.
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Largest canvas we're willing to allocate, in bytes.
const MAX_CANVAS_BYTES: u64 = isize::MAX as u64;

/// Things that stop a meme from being rendered.
#[derive(Debug)]
pub enum RenderError {
    /// Nothing left to draw after trimming.
    EmptyText,
    /// Neither the configured font nor the bundled one could be loaded.
    FontLoad(String),
    /// The upload isn't an image we can read.
    ImageDecode(String),
    /// The source image has a zero dimension.
    InvalidImage {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },
    /// Source plus banner doesn't fit in memory.
    CanvasTooLarge,
    /// PNG encoding failed.
    Encode(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::EmptyText => write!(f, "No meme text generated."),
            RenderError::FontLoad(reason) => write!(f, "Failed to load font: {}", reason),
            RenderError::ImageDecode(reason) => write!(f, "Failed to decode image: {}", reason),
            RenderError::InvalidImage { width, height } => {
                write!(f, "Image has no pixels ({}x{})", width, height)
            }
            RenderError::CanvasTooLarge => write!(f, "Image is too large to caption"),
            RenderError::Encode(reason) => write!(f, "Failed to encode meme: {}", reason),
        }
    }
}

impl std::error::Error for RenderError {}

/// A finished meme.
#[derive(Clone, Debug)]
pub struct RenderedMeme {
    /// PNG-encoded image.
    pub png: Vec<u8>,
    /// Canvas width, same as the source.
    pub width: u32,
    /// Source height plus banner height.
    pub height: u32,
    /// How the text was laid out.
    pub layout: TextLayout,
}

/// Renders memes with one preloaded font. Clone it or put it in an `Arc` to share.
#[derive(Clone, Debug)]
pub struct MemeRenderer {
    font: MemeFont,
}

impl MemeRenderer {
    /// Uses an already loaded font.
    pub fn new(font: MemeFont) -> Self {
        Self { font }
    }

    /// Loads the font at `font_path`, falling back to the bundled font.
    pub fn load(font_path: &Path) -> Result<Self, RenderError> {
        MemeFont::load(font_path).map(Self::new)
    }

    /// The font in use.
    pub fn font(&self) -> &MemeFont {
        &self.font
    }

    /// Composes the meme without encoding it.
    #[instrument(skip_all, fields(width = source.width(), height = source.height(), font_size = style.font_size_px))]
    pub fn compose(
        &self,
        source: &RgbImage,
        text: &str,
        style: &StyleConfig,
    ) -> Result<(RgbImage, TextLayout), RenderError> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidImage { width, height });
        }
        let text = normalize_text(text)?;

        let scale = self.font.scale(style.font_size_px);
        let layout = TextLayout::new(&self.font, scale, &text, width);
        debug!(
            "Wrapped into {} lines, banner {}px",
            layout.lines.len(),
            layout.banner_height
        );

        let canvas_height = height
            .checked_add(layout.banner_height)
            .ok_or(RenderError::CanvasTooLarge)?;
        if u64::from(width) * u64::from(canvas_height) * 3 > MAX_CANVAS_BYTES {
            return Err(RenderError::CanvasTooLarge);
        }
        let mut canvas = RgbImage::from_pixel(width, canvas_height, BLACK);
        let image_y = match style.position {
            Position::Top => layout.banner_height,
            Position::Bottom => 0,
        };
        imageops::replace(&mut canvas, source, 0, i64::from(image_y));

        let outline = style.outline_px();
        let mut y = layout.text_start_y(style.position, height) as i32;
        for ((line, line_width), line_height) in layout
            .lines
            .iter()
            .zip(&layout.line_widths)
            .zip(&layout.line_heights)
        {
            let x = centered_x(width, *line_width);
            draw_outlined_text(
                &mut canvas,
                &self.font,
                scale,
                (x, y),
                outline,
                style.text_color,
                line,
            );
            y += (line_height + LINE_SPACING) as i32;
        }

        Ok((canvas, layout))
    }

    /// Composes the meme and encodes it as PNG.
    pub fn render(
        &self,
        source: &RgbImage,
        text: &str,
        style: &StyleConfig,
    ) -> Result<RenderedMeme, RenderError> {
        let (canvas, layout) = self.compose(source, text, style)?;
        let mut output = Cursor::new(Vec::new());
        canvas
            .write_to(&mut output, ImageFormat::Png)
            .map_err(|err| RenderError::Encode(err.to_string()))?;
        Ok(RenderedMeme {
            png: output.into_inner(),
            width: canvas.width(),
            height: canvas.height(),
            layout,
        })
    }
}

/// Draws `text` in black at every offset within `outline` px, then in `color` on top.
fn draw_outlined_text(
    canvas: &mut RgbImage,
    font: &MemeFont,
    scale: PxScale,
    (x, y): (i32, i32),
    outline: i32,
    color: Rgb<u8>,
    text: &str,
) {
    for ox in -outline..=outline {
        for oy in -outline..=outline {
            if ox == 0 && oy == 0 {
                continue;
            }
            draw_text_mut(canvas, BLACK, x + ox, y + oy, scale, font.inner(), text);
        }
    }
    draw_text_mut(canvas, color, x, y, scale, font.inner(), text);
}

/// Trims and upper-cases meme text.
pub fn normalize_text(text: &str) -> Result<String, RenderError> {
    let text = text.trim().to_uppercase();
    if text.is_empty() {
        return Err(RenderError::EmptyText);
    }
    Ok(text)
}
