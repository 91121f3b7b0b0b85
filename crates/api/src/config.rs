use std::time::Duration;

use speakwell_core::batch::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use speakwell_core::materials::DEFAULT_MAX_UPLOAD_BYTES;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Pause between session inserts when generating a folder (default: `0`).
    pub session_write_delay_ms: u64,
    /// Attempts per session insert, first try included (default: `3`).
    pub session_write_max_attempts: u32,
    /// Largest accepted material upload in bytes (default: 25 MiB).
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `SESSION_WRITE_DELAY_MS`     | `0`                     |
    /// | `SESSION_WRITE_MAX_ATTEMPTS` | `3`                     |
    /// | `MAX_UPLOAD_BYTES`           | `26214400`              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let session_write_delay_ms: u64 = std::env::var("SESSION_WRITE_DELAY_MS")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("SESSION_WRITE_DELAY_MS must be a valid u64");

        let session_write_max_attempts: u32 = std::env::var("SESSION_WRITE_MAX_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
            .parse()
            .expect("SESSION_WRITE_MAX_ATTEMPTS must be a valid u32");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            session_write_delay_ms,
            session_write_max_attempts,
            max_upload_bytes,
        }
    }

    /// Throttle between session inserts.
    pub fn session_write_delay(&self) -> Duration {
        Duration::from_millis(self.session_write_delay_ms)
    }

    /// Per-insert retry policy for folder generation.
    pub fn session_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.session_write_max_attempts,
            ..RetryPolicy::default()
        }
    }
}
