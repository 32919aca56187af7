// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Error detail is only exposed to clients in development.
    #[must_use]
    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub environment: Environment,
    pub page_size_default: usize,
    pub max_page_size: usize,
    pub cors_origin: String,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("vitrine.db"),
            port: 5000,
            environment: Environment::Development,
            page_size_default: 10,
            max_page_size: 100,
            cors_origin: "*".to_string(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: env::var("VITRINE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            port: env_u16("VITRINE_PORT", env_u16("PORT", defaults.port)),
            environment: env::var("VITRINE_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or(defaults.environment),
            page_size_default: env_usize("VITRINE_PAGE_SIZE", defaults.page_size_default),
            max_page_size: env_usize("VITRINE_MAX_PAGE_SIZE", defaults.max_page_size),
            cors_origin: env::var("VITRINE_CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            log_json: env_bool("VITRINE_LOG_JSON", defaults.log_json),
        }
    }
}

pub(crate) fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

pub(crate) fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}
