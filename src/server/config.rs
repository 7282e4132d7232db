//! Server configuration

use anyhow::{Context, Result};
use axum::http::HeaderValue;

/// Origin of the browser client during development
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

const DEFAULT_PORT: u16 = 8080;

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8080`
    pub addr: String,

    /// Origins allowed to call the API from a browser
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// * `TVM_ADDR` - full bind address
    /// * `PORT` - port on 0.0.0.0 when `TVM_ADDR` is unset
    /// * `TVM_ALLOWED_ORIGINS` - comma separated CORS origins
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup (environment, test map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = match lookup("TVM_ADDR") {
            Some(addr) => addr,
            None => {
                let port = match lookup("PORT") {
                    Some(raw) => raw
                        .parse::<u16>()
                        .with_context(|| format!("PORT is not a valid port: {:?}", raw))?,
                    None => DEFAULT_PORT,
                };
                format!("0.0.0.0:{}", port)
            }
        };

        let allowed_origins = match lookup("TVM_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        };

        let config = Self {
            addr,
            allowed_origins,
        };
        config.origin_headers()?;
        Ok(config)
    }

    /// Allowed origins as header values for the CORS layer
    pub fn origin_headers(&self) -> Result<Vec<HeaderValue>> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("TVM_ALLOWED_ORIGINS has an invalid origin: {:?}", origin))
            })
            .collect()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: format!("0.0.0.0:{}", DEFAULT_PORT),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        }
    }
}
