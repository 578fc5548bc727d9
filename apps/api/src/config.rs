use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_LLM_BASE_URL: &str = "https://router.huggingface.co/v1";
const DEFAULT_LLM_MODEL: &str = "meta-llama/Llama-3.1-8B-Instruct:novita";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    /// Optional JSON file overriding the screening word lists.
    pub vocabulary_path: Option<PathBuf>,
}

/// Settings for the OpenAI-compatible completion endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Total attempts per call, including the first. 1 disables retries.
    pub max_attempts: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm: LlmConfig {
                api_key: require_env("OPENAI_API_KEY")?,
                base_url: env_or("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
                model: env_or("LLM_MODEL", DEFAULT_LLM_MODEL),
                timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
                max_attempts: parse_env("LLM_MAX_ATTEMPTS", 1)?,
            },
            port: parse_env("PORT", 10000)?,
            rust_log: env_or("RUST_LOG", "info"),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            vocabulary_path: std::env::var("ATS_VOCABULARY_PATH").ok().map(PathBuf::from),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}
