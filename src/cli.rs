//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::path::PathBuf;

use crate::constants::{DEFAULT_API_BASE, DEFAULT_FONT_PATH, DEFAULT_MODEL};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "MEMEFORGE_DEBUG")]
    /// Enable debug logging. Env: MEMEFORGE_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "5000", env = "MEMEFORGE_PORT")]
    /// http listener, defaults to `5000`.
    /// Env: MEMEFORGE_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "MEMEFORGE_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: MEMEFORGE_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    /// API key for the Gemini API.
    /// Env: GEMINI_API_KEY
    pub api_key: String,

    #[clap(long, default_value = DEFAULT_MODEL, env = "MEMEFORGE_MODEL")]
    /// Model used for captions, stories and meme text.
    /// Env: MEMEFORGE_MODEL
    pub model: String,

    #[clap(long, default_value = DEFAULT_API_BASE, env = "MEMEFORGE_API_BASE")]
    /// Base URL of the Gemini REST API.
    /// Env: MEMEFORGE_API_BASE
    pub api_base: String,

    #[clap(long, default_value = "60", env = "MEMEFORGE_TIMEOUT_SECS")]
    /// Timeout for a single call to the AI provider, in seconds.
    /// Env: MEMEFORGE_TIMEOUT_SECS
    pub timeout_secs: u64,

    #[clap(long, default_value = DEFAULT_FONT_PATH, env = "MEMEFORGE_FONT_PATH")]
    /// Primary font for meme text; the bundled font is used if this can't be loaded.
    /// Env: MEMEFORGE_FONT_PATH
    pub font_path: PathBuf,

    #[clap(long, env = "MEMEFORGE_MAX_UPLOAD_BYTES")]
    /// Largest accepted request body, defaults to 10MiB.
    /// Env: MEMEFORGE_MAX_UPLOAD_BYTES
    pub max_upload_bytes: Option<usize>,
}
