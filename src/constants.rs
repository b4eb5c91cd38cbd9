//! Shared constants for layout, style defaults and the AI client
//!

/// Smallest font size (px) a request can ask for.
pub const MIN_FONT_SIZE: u32 = 24;

/// Largest font size (px) a request can ask for.
pub const MAX_FONT_SIZE: u32 = 96;

/// Font size used when the request doesn't give a usable one.
pub const DEFAULT_FONT_SIZE: u32 = 50;

/// Total horizontal padding (px) subtracted from the image width when wrapping.
pub const TEXT_HORIZONTAL_PADDING: u32 = 40;

/// Vertical gap (px) between two wrapped lines.
pub const LINE_SPACING: u32 = 15;

/// Extra banner height (px) on top of the text block, split above and below.
pub const BANNER_PADDING: u32 = 60;

/// Minimum outline stroke (px).
pub const MIN_OUTLINE: i32 = 2;

/// Font size is divided by this to get the outline stroke.
pub const OUTLINE_DIVISOR: u32 = 15;

/// Where the primary font lives unless configured otherwise.
pub const DEFAULT_FONT_PATH: &str = "static/fonts/impact.ttf";

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default upload limit in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Content type for rendered memes.
pub const PNG_CONTENT_TYPE: &str = "image/png";
