use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::llm_client::{groq, ollama};

/// A generation provider that can appear in `LLM_PROVIDERS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    Groq,
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "groq" => Ok(Provider::Groq),
            other => bail!("Unknown LLM provider '{other}' (expected 'ollama' or 'groq')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every generation or scoring backend is optional; a missing credential
/// disables that backend rather than failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub ollama_api_url: Option<String>,
    pub ollama_model: String,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    /// Backend preference order.
    pub llm_providers: Vec<Provider>,
    pub apilayer_key: Option<String>,
    pub frontend_url: Option<String>,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            ollama_api_url: optional_env("OLLAMA_API_URL"),
            ollama_model: optional_env("OLLAMA_MODEL")
                .unwrap_or_else(|| ollama::DEFAULT_MODEL.to_string()),
            groq_api_key: optional_env("GROQ_API_KEY"),
            groq_model: optional_env("GROQ_MODEL")
                .unwrap_or_else(|| groq::DEFAULT_MODEL.to_string()),
            llm_providers: parse_providers(
                &optional_env("LLM_PROVIDERS").unwrap_or_else(|| "ollama,groq".to_string()),
            )?,
            apilayer_key: optional_env("APILAYER_KEY"),
            frontend_url: optional_env("FRONTEND_URL"),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }
}

/// Reads a variable, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_providers(raw: &str) -> Result<Vec<Provider>> {
    let mut providers = Vec::new();
    for name in raw.split(',').filter(|s| !s.trim().is_empty()) {
        let provider: Provider = name.parse()?;
        if !providers.contains(&provider) {
            providers.push(provider);
        }
    }
    Ok(providers)
}
