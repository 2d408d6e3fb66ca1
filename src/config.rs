use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://frequentium-backend-ykmc.onrender.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Where and how to reach the attendance backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Use `GET /frequencia/jogo/{id}` for per-game listings. The backend is
    /// not known to serve that route, so this stays off unless it is deployed.
    /// Reconciliation always lists everything and filters locally.
    pub server_side_game_filter: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            server_side_game_filter: false,
        }
    }
}

impl ApiConfig {
    /// Read `FREQUENTIUM_API_URL`, `FREQUENTIUM_TIMEOUT_SECS` and
    /// `FREQUENTIUM_GAME_FILTER`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let base_url = lookup("FREQUENTIUM_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.base_url);
        let timeout = lookup("FREQUENTIUM_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let server_side_game_filter = lookup("FREQUENTIUM_GAME_FILTER")
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self { base_url, timeout, server_side_game_filter }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Apply a per-request base URL. Blank overrides are ignored.
    pub fn with_base_url_override(self, base_url: Option<&str>) -> Self {
        match base_url.map(str::trim).filter(|s| !s.is_empty()) {
            Some(url) => self.with_base_url(url),
            None => self,
        }
    }

    /// Join a resource path onto the base URL with exactly one slash between them.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}
