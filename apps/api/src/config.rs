use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Provider credentials are optional: an unset or blank key disables that provider
/// rather than failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub huggingface_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Ceiling on a single provider call, separate from the rate-limit delay.
    pub provider_timeout_secs: u64,
    pub rate_limit_retry_delay_secs: u64,
    pub max_upload_bytes: usize,
    pub max_job_description_chars: usize,
    /// Sent to OpenRouter as `HTTP-Referer`.
    pub public_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            huggingface_api_key: None,
            gemini_api_key: None,
            openrouter_api_key: None,
            groq_api_key: None,
            port: 8080,
            rust_log: "info".to_string(),
            provider_timeout_secs: 45,
            rate_limit_retry_delay_secs: 5,
            max_upload_bytes: 10 * 1024 * 1024,
            max_job_description_chars: 20_000,
            public_origin: "http://localhost:5173".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Config {
            huggingface_api_key: optional("HUGGINGFACE_API_KEY"),
            gemini_api_key: optional("GEMINI_API_KEY"),
            openrouter_api_key: optional("OPENROUTER_API_KEY"),
            groq_api_key: optional("GROQ_API_KEY"),
            port: parse_or(optional("PORT"), defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: optional("RUST_LOG").unwrap_or(defaults.rust_log),
            provider_timeout_secs: parse_or(
                optional("PROVIDER_TIMEOUT_SECS"),
                defaults.provider_timeout_secs,
            )
            .context("PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?,
            rate_limit_retry_delay_secs: parse_or(
                optional("RATE_LIMIT_RETRY_DELAY_SECS"),
                defaults.rate_limit_retry_delay_secs,
            )
            .context("RATE_LIMIT_RETRY_DELAY_SECS must be a whole number of seconds")?,
            max_upload_bytes: parse_or(optional("MAX_UPLOAD_BYTES"), defaults.max_upload_bytes)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            max_job_description_chars: parse_or(
                optional("MAX_JOB_DESCRIPTION_CHARS"),
                defaults.max_job_description_chars,
            )
            .context("MAX_JOB_DESCRIPTION_CHARS must be a character count")?,
            public_origin: optional("PUBLIC_ORIGIN").unwrap_or(defaults.public_origin),
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => Ok(raw.parse::<T>()?),
        None => Ok(default),
    }
}
