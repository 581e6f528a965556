// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file backing the local key-value store
    pub data_file: PathBuf,
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// Session lifetime, in days
    pub session_ttl_days: i64,
    /// Interval between background session refreshes, in seconds
    pub session_refresh_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let config = Self {
            data_file: env::var("RECICLA_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/recicla.json")),
            port: parse_env("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            session_ttl_days: parse_env("SESSION_TTL_DAYS", 7)?,
            session_refresh_secs: parse_env("SESSION_REFRESH_SECS", 3600)?,
        };

        if config.session_ttl_days <= 0 {
            return Err(ConfigError::Invalid("SESSION_TTL_DAYS"));
        }
        if config.session_refresh_secs == 0 {
            return Err(ConfigError::Invalid("SESSION_REFRESH_SECS"));
        }

        Ok(config)
    }

    /// Config for tests: in-process defaults, no environment access.
    pub fn test_default() -> Self {
        Self {
            data_file: PathBuf::from("target/test-data/recicla.json"),
            port: 8080,
            frontend_url: "http://localhost:8081".to_string(),
            session_ttl_days: 7,
            session_refresh_secs: 3600,
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.session_ttl_days)
    }

    pub fn session_refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.session_refresh_secs)
    }
}

/// Read `name`, falling back to `default` when unset.
fn parse_env<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
