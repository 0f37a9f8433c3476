//! Environment-driven settings of the two binaries.

/// Address the match repository service listens on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    /// `0.0.0.0:8080`, reachable from outside the host.
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Read `HOST` and `PORT`; missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = std::env::var("HOST").unwrap_or(defaults.host);
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        Self { host, port }
    }
}

/// Where the round client finds the match repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    pub const DEFAULT_API_URL: &'static str = "http://127.0.0.1:8080";

    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    /// Read `DART_API_URL`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("DART_API_URL").unwrap_or_else(|_| Self::DEFAULT_API_URL.to_string()))
    }
}
