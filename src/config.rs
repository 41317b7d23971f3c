use std::time::Duration;

/// Upper bound on every outbound API call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    pub refresh_interval: Duration,
}

impl Config {
    /// Load settings from the environment (and `.env` if present).
    /// `default_port` differs between the user and admin apps.
    pub fn from_env(default_port: u16) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let api_base_url = std::env::var("API_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(format!("API_BASE_URL must be an http(s) URL, got {}", api_base_url).into());
        }

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default_port);

        let refresh_secs = std::env::var("REFRESH_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            host,
            port,
            refresh_interval: Duration::from_secs(refresh_secs),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
