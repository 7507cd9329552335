//! Runtime configuration, read from `FINANCES_*` environment variables.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_DATABASE_URL: &str = "sqlite:finances.db";
const DEFAULT_UPLOAD_DIR: &str = "./tmp/uploads";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3333";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    /// Directory the uploader writes CSV files into
    pub upload_directory: PathBuf,
    pub bind_address: SocketAddr,
    pub max_connections: u32,
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to the defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address = lookup("FINANCES_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_address = bind_address
            .parse::<SocketAddr>()
            .with_context(|| format!("FINANCES_BIND_ADDR is not a socket address: '{}'", bind_address))?;

        let max_connections = match lookup("FINANCES_DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| format!("FINANCES_DB_MAX_CONNECTIONS must be a positive integer: '{}'", raw))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url: lookup("FINANCES_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            upload_directory: lookup("FINANCES_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            bind_address,
            max_connections,
            cors_origin: lookup("FINANCES_CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }
}
