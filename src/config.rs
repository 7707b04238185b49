use std::env;
use std::time::Duration;

/// Runtime configuration, loaded once at process start.
///
/// No other component reads the environment directly; everything flows
/// through this struct.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server listens on
    pub port: u16,
    /// Adzuna application id; `None` when unset or empty
    pub app_id: Option<String>,
    /// Adzuna application key; `None` when unset or empty
    pub app_key: Option<String>,
    /// Country segment of the upstream search URL
    pub country: String,
    /// Explicit upstream base URL, overriding the one derived from `country`
    pub upstream_base_url: Option<String>,
    /// How long cached upstream payloads stay valid
    pub cache_ttl: Duration,
    /// Fixed-window request budget per client per minute
    pub rate_limit_per_min: u32,
    /// Upstream request timeout
    pub upstream_timeout: Duration,
    /// Fallback log level for the tracing filter
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: parse_var("PORT", 5000)?,
            app_id: non_empty_var("ADZUNA_APP_ID"),
            app_key: non_empty_var("ADZUNA_APP_KEY"),
            country: env::var("ADZUNA_COUNTRY").unwrap_or_else(|_| "us".to_string()),
            upstream_base_url: non_empty_var("UPSTREAM_BASE_URL"),
            cache_ttl: Duration::from_secs(parse_var("CACHE_TTL_SEC", 60u64)?),
            rate_limit_per_min: parse_var("RATE_LIMIT_PER_MIN", 60)?,
            upstream_timeout: Duration::from_secs(parse_var("UPSTREAM_TIMEOUT_SEC", 15u64)?),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Credential pair, present only when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.app_id.as_deref().zip(self.app_key.as_deref())
    }

    /// Base URL of the upstream search API.
    pub fn upstream_base(&self) -> String {
        match &self.upstream_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://api.adzuna.com/v1/api/jobs/{}", self.country),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            app_id: None,
            app_key: None,
            country: "us".to_string(),
            upstream_base_url: None,
            cache_ttl: Duration::from_secs(60),
            rate_limit_per_min: 60,
            upstream_timeout: Duration::from_secs(15),
            log_level: "info".to_string(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}
