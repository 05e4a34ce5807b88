use serde::Deserialize;

use crate::services::availability::DetailLookup;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, sent as the `api_key` query parameter
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Watchmode API key, sent as the `apiKey` query parameter
    pub watchmode_api_key: String,

    /// Watchmode API base URL
    #[serde(default = "default_watchmode_api_url")]
    pub watchmode_api_url: String,

    /// Country code used for availability lookups
    #[serde(default = "default_region")]
    pub region: String,

    /// Outbound request timeout in seconds (0 disables it)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Which media type the availability pipeline asks for when fetching detail
    #[serde(default)]
    pub detail_lookup: DetailLookup,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Emit JSON log lines instead of human-readable ones
    #[serde(default)]
    pub log_json: bool,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_watchmode_api_url() -> String {
    "https://api.watchmode.com/v1".to_string()
}

fn default_region() -> String {
    "US".to_string()
}

fn default_http_timeout_secs() -> u64 {
    15
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Outbound request timeout, if one is configured
    pub fn http_timeout(&self) -> Option<std::time::Duration> {
        (self.http_timeout_secs > 0).then(|| std::time::Duration::from_secs(self.http_timeout_secs))
    }
}
