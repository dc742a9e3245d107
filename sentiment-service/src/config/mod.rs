use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Gemini API base URL.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-lite";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

#[derive(Debug, Clone, Deserialize)]
pub struct SentimentConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    /// Missing keys are tolerated at startup; only analysis requests fail.
    pub api_key: Option<Secret<String>>,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Client-side timeout. `None` leaves the transport default in place.
    pub timeout_secs: Option<u64>,
}

impl SentimentConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(SentimentConfig {
            common: common_config,
            service_name: get_env("SERVICE_NAME", "sentiment-service"),
            log_level: get_env("LOG_LEVEL", "info"),
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            gemini: GeminiSettings {
                api_key: get_optional_env("GEMINI_API_KEY").map(Secret::new),
                api_base: get_env("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
                model: get_env("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                temperature: parse_env("GEMINI_TEMPERATURE", DEFAULT_TEMPERATURE)?,
                max_output_tokens: parse_env("GEMINI_MAX_OUTPUT_TOKENS", DEFAULT_MAX_OUTPUT_TOKENS)?,
                timeout_secs: get_optional_env("GEMINI_TIMEOUT_SECS")
                    .map(|v| parse_value("GEMINI_TIMEOUT_SECS", &v))
                    .transpose()?,
            },
        })
    }
}

impl GeminiSettings {
    pub fn new(api_key: Option<&str>, api_base: &str) -> Self {
        Self {
            api_key: api_key.map(|k| Secret::new(k.to_string())),
            api_base: api_base.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: None,
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e))
    })
}
