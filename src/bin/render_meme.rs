//! Render a meme from a local image and caption, no AI involved.
//!
//!   render_meme photo.jpg "when the code works on the first try" --position top

use anyhow::{Context, Result};
use clap::Parser;
use memeforge::config::setup_logging;
use memeforge::constants::DEFAULT_FONT_PATH;
use memeforge::render::{MemeRenderer, SourceImage, StyleConfig};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "render_meme")]
#[command(about = "Burn a caption into a banner above or below an image")]
struct Args {
    /// Source image (JPEG or PNG)
    input: PathBuf,

    /// Caption text, upper-cased when drawn
    text: String,

    /// Where to write the PNG
    #[arg(long, short, default_value = "meme.png")]
    output: PathBuf,

    /// Font size in px, clamped to 24..=96
    #[arg(long)]
    font_size: Option<String>,

    /// Text color as #RGB or #RRGGBB
    #[arg(long)]
    font_color: Option<String>,

    /// `top` or `bottom`
    #[arg(long)]
    position: Option<String>,

    /// Primary font; the bundled font is used if it can't be loaded
    #[arg(long, default_value = DEFAULT_FONT_PATH, env = "MEMEFORGE_FONT_PATH")]
    font: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.debug).map_err(|err| anyhow::anyhow!(err))?;

    let bytes =
        fs::read(&args.input).with_context(|| format!("Failed to read {}", args.input.display()))?;
    let source = SourceImage::decode(&bytes)?;
    let renderer = MemeRenderer::load(&args.font)?;
    let style = StyleConfig::from_form(
        args.font_size.as_deref(),
        args.font_color.as_deref(),
        args.position.as_deref(),
        None,
    );

    let meme = renderer.render(&source.pixels, &args.text, &style)?;
    fs::write(&args.output, &meme.png)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Wrote {} ({}x{}, {} lines).",
        args.output.display(),
        meme.width,
        meme.height,
        meme.layout.lines.len()
    );
    Ok(())
}
