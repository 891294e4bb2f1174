use std::path::PathBuf;

use clap::Parser;

/// Gemini tool-calling demo
#[derive(Debug, Parser)]
#[command(
    name = "gemwire",
    about = "Run a two-turn tool-calling exchange against the Gemini generateContent API"
)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "GEMWIRE_CONFIG")]
    pub config: Option<PathBuf>,

    /// API key, overrides the configured one
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name, overrides the configured default
    #[arg(short, long, env = "GEMINI_MODEL")]
    pub model: Option<String>,

    /// Override the API base URL
    #[arg(long)]
    pub base_url: Option<url::Url>,

    /// Opening user prompt
    #[arg(
        short,
        long,
        default_value = "What's the weather in Tokyo? Also, what is 25 multiplied by 17?"
    )]
    pub prompt: String,

    /// Maximum output tokens per call
    #[arg(long, default_value_t = 1024)]
    pub max_tokens: u32,
}
