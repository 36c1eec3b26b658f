use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a numeric variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Absent key means the optimize endpoint answers 503.
    pub anthropic_api_key: Option<String>,
    pub pdflatex_path: PathBuf,
    pub compiler_timeout_secs: u64,
    pub compiler_max_output_bytes: usize,
    /// Overrides embedded skeletons and class files, file by file.
    pub templates_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            anthropic_api_key: None,
            pdflatex_path: PathBuf::from("pdflatex"),
            compiler_timeout_secs: 60,
            compiler_max_output_bytes: 10 * 1024 * 1024,
            templates_dir: None,
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            anthropic_api_key: non_empty("ANTHROPIC_API_KEY"),
            pdflatex_path: non_empty("PDFLATEX_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.pdflatex_path),
            compiler_timeout_secs: parse_or(
                &lookup,
                "COMPILER_TIMEOUT_SECS",
                defaults.compiler_timeout_secs,
            )?,
            compiler_max_output_bytes: parse_or(
                &lookup,
                "COMPILER_MAX_OUTPUT_BYTES",
                defaults.compiler_max_output_bytes,
            )?,
            templates_dir: non_empty("TEMPLATES_DIR").map(PathBuf::from),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
