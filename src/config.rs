use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted JSON artifacts and rendered output.
    pub output_dir: PathBuf,
    pub target_pages: f64,
    pub max_iterations: u32,
    /// Optional custom LaTeX template; the built-in template is used when unset.
    pub template_path: Option<PathBuf>,
    /// Run pdflatex on the rendered document after the pipeline finishes.
    pub compile_pdf: bool,
    /// Enables the advisory LLM ranking step when set.
    pub anthropic_api_key: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            output_dir: PathBuf::from(require_env("CVFORGE_OUTPUT_DIR")?),
            target_pages: std::env::var("CVFORGE_TARGET_PAGES")
                .unwrap_or_else(|_| "2.0".to_string())
                .parse::<f64>()
                .context("CVFORGE_TARGET_PAGES must be a number")?,
            max_iterations: std::env::var("CVFORGE_MAX_ITERATIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse::<u32>()
                .context("CVFORGE_MAX_ITERATIONS must be an integer")?,
            template_path: std::env::var("CVFORGE_TEMPLATE").ok().map(PathBuf::from),
            compile_pdf: matches!(
                std::env::var("CVFORGE_COMPILE").as_deref(),
                Ok("1") | Ok("true")
            ),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
