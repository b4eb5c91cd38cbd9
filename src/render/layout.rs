//! Word wrapping and banner geometry.

use ab_glyph::PxScale;

use super::font::MemeFont;
use super::style::Position;
use crate::constants::{BANNER_PADDING, LINE_SPACING, TEXT_HORIZONTAL_PADDING};

/// Wrapped and measured text, plus the banner it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLayout {
    /// Wrapped lines, top to bottom.
    pub lines: Vec<String>,
    /// Measured width of each line.
    pub line_widths: Vec<u32>,
    /// Measured height of each line.
    pub line_heights: Vec<u32>,
    /// Line heights plus the spacing between them.
    pub total_text_height: u32,
    /// Height of the banner strip.
    pub banner_height: u32,
}

impl TextLayout {
    /// Wraps and measures `text` for an image `image_width` px wide.
    pub fn new(font: &MemeFont, scale: PxScale, text: &str, image_width: u32) -> Self {
        let max_width = max_text_width(image_width);
        let lines = wrap_words(text, max_width, |candidate| {
            font.measure(scale, candidate).width
        });
        let (line_widths, line_heights): (Vec<u32>, Vec<u32>) = lines
            .iter()
            .map(|line| {
                let extent = font.measure(scale, line);
                (extent.width, extent.height)
            })
            .unzip();
        let total_text_height = total_text_height(&line_heights);

        Self {
            lines,
            line_widths,
            line_heights,
            total_text_height,
            banner_height: total_text_height + BANNER_PADDING,
        }
    }

    /// First baseline cursor for the banner at `position`.
    pub fn text_start_y(&self, position: Position, image_height: u32) -> u32 {
        let offset = (self.banner_height - self.total_text_height) / 2;
        match position {
            Position::Top => offset,
            Position::Bottom => image_height + offset,
        }
    }
}

/// The widest a line may be on an image `image_width` px wide.
pub fn max_text_width(image_width: u32) -> u32 {
    image_width.saturating_sub(TEXT_HORIZONTAL_PADDING)
}

/// Greedy word wrap. Words are never split, so a word wider than
/// `max_width` ends up alone on its line.
pub fn wrap_words(text: &str, max_width: u32, measure: impl Fn(&str) -> u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Sum of line heights plus spacing between consecutive lines.
pub fn total_text_height(line_heights: &[u32]) -> u32 {
    let gaps = line_heights.len().saturating_sub(1) as u32;
    line_heights.iter().sum::<u32>() + LINE_SPACING * gaps
}

/// Left edge that centers a line of `line_width` on the canvas. Negative when the line overflows.
pub fn centered_x(canvas_width: u32, line_width: u32) -> i32 {
    let diff = i64::from(canvas_width) - i64::from(line_width);
    diff.div_euclid(2) as i32
}
