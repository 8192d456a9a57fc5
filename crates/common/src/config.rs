//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Smallest header buffer the HTTP/1 connection accepts
pub const MIN_REQUEST_HEADER_MAX_SIZE: usize = 8192;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service identification
    pub service_name: String,
    pub version: String,

    /// Runtime configuration
    pub log_level: String,
    pub log_format: String,
    pub port: u16,

    /// Largest request head, in bytes, read before the server answers 431
    pub request_header_max_size: usize,
    /// Time a client gets to send the full request head
    pub read_header_timeout_ms: u64,

    /// Dialog store provider (postgres, memory)
    pub dialog_store: String,
    /// Database connection URL
    pub database_url: String,
    pub db_max_connections: u32,

    /// Identity provider (rest, mock)
    pub identity_provider: String,
    /// Base URL of the user service that owns identities
    pub identity_base_url: String,
    pub identity_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            service_name: var_or("SERVICE_NAME", "myfacebook-dialog"),
            version: var_or("VERSION", "version_not_set"),

            log_level: var_or("LOG_LEVEL", "info"),
            log_format: var_or("LOG_FORMAT", "pretty"),
            port: parse_var("HTTP_INT_PORT", 9091)?,

            request_header_max_size: parse_var("REQUEST_HEADER_MAX_SIZE", 10000)?,
            read_header_timeout_ms: parse_var("REQUEST_READ_HEADER_TIMEOUT_MILLISECONDS", 2000)?,

            dialog_store: var_or("DIALOG_STORE", "postgres"),
            database_url: match env::var("DATABASE_URL") {
                Ok(url) => url,
                Err(_) => database_url_from_parts()?,
            },
            db_max_connections: parse_var("DB_MAX_OPEN_CONNECTIONS", 10)?,

            identity_provider: var_or("IDENTITY_PROVIDER", "rest"),
            identity_base_url: var_or("MYFACEBOOK_API_BASE_URL", "http://localhost:9090"),
            identity_timeout_secs: parse_var("IDENTITY_REQUEST_TIMEOUT_SECS", 30)?,
        };

        if config.request_header_max_size < MIN_REQUEST_HEADER_MAX_SIZE {
            bail!(
                "REQUEST_HEADER_MAX_SIZE must be at least {}, got {}",
                MIN_REQUEST_HEADER_MAX_SIZE,
                config.request_header_max_size
            );
        }

        Ok(config)
    }

    pub fn read_header_timeout(&self) -> Duration {
        Duration::from_millis(self.read_header_timeout_ms)
    }

    /// Default tracing directive derived from `LOG_LEVEL`
    pub fn log_directive(&self) -> &'static str {
        match self.log_level.as_str() {
            "debug" => "debug",
            "warning" | "warn" => "warn",
            "error" => "error",
            _ => "info",
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a valid number, got {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

fn database_url_from_parts() -> Result<String> {
    let host = var_or("DB_HOST", "localhost");
    let port: u16 = parse_var("DB_PORT", 5432)?;
    let user = var_or("DB_USERNAME", "postgres");
    let password = var_or("DB_PASSWORD", "secret");
    let name = var_or("DB_NAME", "myfacebook-dialog");
    let ssl_mode = var_or("DB_SSL_MODE", "disable");

    Ok(format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        user, password, host, port, name, ssl_mode
    ))
}
