//! Print the Gemini models the API key can use.

use anyhow::Result;
use clap::Parser;
use memeforge::constants::{DEFAULT_API_BASE, DEFAULT_MODEL};
use memeforge::genai::GeminiClient;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "list_models")]
struct Args {
    /// Gemini API key
    #[arg(required = true, long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Base URL of the Gemini REST API
    #[arg(long, default_value = DEFAULT_API_BASE, env = "MEMEFORGE_API_BASE")]
    api_base: String,

    /// Only show models that support generateContent
    #[arg(long)]
    generate_only: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = GeminiClient::new(
        &args.api_key,
        &args.api_base,
        DEFAULT_MODEL,
        Duration::from_secs(30),
    )?;

    for model in client.list_models().await? {
        if args.generate_only
            && !model
                .supported_generation_methods
                .iter()
                .any(|method| method == "generateContent")
        {
            continue;
        }
        println!("{}", model.name);
    }
    Ok(())
}
