//! Style options for meme text, parsed leniently from form input.
//!
//! Nothing in here fails: malformed values fall back to defaults.

use std::num::IntErrorKind;

use image::Rgb;
use tracing::debug;

use crate::constants::{DEFAULT_FONT_SIZE, MAX_FONT_SIZE, MIN_FONT_SIZE};

/// Opaque white, the default text color.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Where the banner goes relative to the source image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    /// Banner above the image.
    Top,
    /// Banner below the image.
    #[default]
    Bottom,
}

impl Position {
    /// `top` (any case, surrounding whitespace ignored) is [`Position::Top`], anything else is bottom.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("top") {
            Position::Top
        } else {
            Position::Bottom
        }
    }
}

/// How the meme text should look.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleConfig {
    /// Font size in px, always within [`MIN_FONT_SIZE`]..=[`MAX_FONT_SIZE`].
    pub font_size_px: u32,
    /// Fill color for the text.
    pub text_color: Rgb<u8>,
    /// Banner placement.
    pub position: Position,
    /// Tone hint for the text generator, the renderer ignores it.
    pub tone_label: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size_px: DEFAULT_FONT_SIZE,
            text_color: WHITE,
            position: Position::Bottom,
            tone_label: String::new(),
        }
    }
}

impl StyleConfig {
    /// Builds a style from raw form fields, missing fields are `None`.
    pub fn from_form(
        font_size: Option<&str>,
        font_color: Option<&str>,
        position: Option<&str>,
        tone: Option<&str>,
    ) -> Self {
        Self {
            font_size_px: parse_font_size(font_size.unwrap_or_default()),
            text_color: parse_hex_color(font_color.unwrap_or_default()),
            position: Position::parse(position.unwrap_or_default()),
            tone_label: tone.unwrap_or_default().trim().to_lowercase(),
        }
    }

    /// Outline stroke width in px for this font size.
    pub fn outline_px(&self) -> i32 {
        let scaled = (self.font_size_px / crate::constants::OUTLINE_DIVISOR) as i32;
        scaled.max(crate::constants::MIN_OUTLINE)
    }
}

/// Clamps an integer font size into the allowed range.
pub fn clamp_font_size(size: i64) -> u32 {
    size.clamp(i64::from(MIN_FONT_SIZE), i64::from(MAX_FONT_SIZE)) as u32
}

/// Parses a font size, anything that isn't an integer becomes the default.
pub fn parse_font_size(raw: &str) -> u32 {
    let raw = raw.trim();
    if raw.is_empty() {
        return DEFAULT_FONT_SIZE;
    }
    match raw.parse::<i64>() {
        Ok(size) => clamp_font_size(size),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => MAX_FONT_SIZE,
        Err(err) if *err.kind() == IntErrorKind::NegOverflow => MIN_FONT_SIZE,
        Err(err) => {
            debug!("Ignoring font size {:?}: {}", raw, err);
            DEFAULT_FONT_SIZE
        }
    }
}

/// Parses `#RGB` / `#RRGGBB` (the `#` is optional), anything else is white.
pub fn parse_hex_color(raw: &str) -> Rgb<u8> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        debug!("Ignoring font color {:?}: not hex", raw);
        return WHITE;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => {
            if !raw.trim().is_empty() {
                debug!("Ignoring font color {:?}: wrong length", raw);
            }
            return WHITE;
        }
    };

    let channel = |idx: usize| u8::from_str_radix(&expanded[idx..idx + 2], 16);
    match (channel(0), channel(2), channel(4)) {
        (Ok(r), Ok(g), Ok(b)) => Rgb([r, g, b]),
        _ => WHITE,
    }
}
