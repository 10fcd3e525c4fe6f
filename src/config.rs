// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Session tokens are issued by the external auth provider; this service only
//! needs the shared key to verify them.

use crate::services::rollup::WeekNumbering;
use std::env;

/// Default length of the daily activity graph, in days.
pub const DEFAULT_GRAPH_DAYS: u32 = 30;

/// Longest daily window a caller may request.
pub const MAX_GRAPH_DAYS: u32 = 366;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// HS256 key used to verify session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Default number of trailing days in daily activity graphs
    pub graph_days: u32,
    /// Week-of-year convention used by the weekly rollup
    pub week_numbering: WeekNumbering,
}

impl Config {
    /// Deterministic configuration for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            graph_days: DEFAULT_GRAPH_DAYS,
            week_numbering: WeekNumbering::Sunday,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let graph_days = match env::var("GRAPH_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|days| *days <= MAX_GRAPH_DAYS)
                .ok_or(ConfigError::Invalid("GRAPH_DAYS", raw))?,
            Err(_) => DEFAULT_GRAPH_DAYS,
        };

        let week_numbering = match env::var("WEEK_NUMBERING") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("WEEK_NUMBERING", raw))?,
            Err(_) => WeekNumbering::default(),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            graph_days,
            week_numbering,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global; keep every mutation in one test.
    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::remove_var("GRAPH_DAYS");
        env::remove_var("WEEK_NUMBERING");

        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.graph_days, DEFAULT_GRAPH_DAYS);
        assert_eq!(config.week_numbering, WeekNumbering::Sunday);

        env::set_var("GRAPH_DAYS", "14");
        env::set_var("WEEK_NUMBERING", "iso");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.graph_days, 14);
        assert_eq!(config.week_numbering, WeekNumbering::Iso);

        env::set_var("GRAPH_DAYS", "1000");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("GRAPH_DAYS", _))
        ));

        env::set_var("GRAPH_DAYS", "30");
        env::set_var("WEEK_NUMBERING", "monday");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("WEEK_NUMBERING", _))
        ));

        env::remove_var("GRAPH_DAYS");
        env::remove_var("WEEK_NUMBERING");
    }
}
