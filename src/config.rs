//! Runtime configuration read from the environment.
//!
//! `main` loads a `.env` file first (if present), so every key below can be
//! set there or in the process environment.
//!
//! | Key | Default |
//! |---|---|
//! | `APP_DATABASE_URL` | `postgresql://localhost:5432/resource_api` |
//! | `APP_STORAGE` | `postgres` (`memory` keeps data in-process) |
//! | `APP_BIND_ADDR` | `0.0.0.0:3000` |
//! | `APP_PAGE_SIZE` | `10` |
//! | `APP_MAX_PAGE_SIZE` | `100` |
//! | `APP_DB_MAX_CONNECTIONS` | `10` |

use std::str::FromStr;

use thiserror::Error;

use crate::pagination::PageNumberPagination;

const DEFAULT_DATABASE_URL: &str = "postgresql://localhost:5432/resource_api";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: expected {expected}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub storage: StorageBackend,
    pub bind_addr: String,
    pub page_size: usize,
    pub max_page_size: usize,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("APP_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = lookup("APP_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let storage = parse(&lookup, "APP_STORAGE", "postgres or memory", StorageBackend::Postgres)?;
        let page_size = parse(&lookup, "APP_PAGE_SIZE", "a positive integer", 10usize)?;
        let max_page_size = parse(&lookup, "APP_MAX_PAGE_SIZE", "a positive integer", 100usize)?;
        let db_max_connections =
            parse(&lookup, "APP_DB_MAX_CONNECTIONS", "a positive integer", 10u32)?;

        if page_size == 0 {
            return Err(invalid("APP_PAGE_SIZE", "0", "a positive integer"));
        }
        if max_page_size < page_size {
            return Err(invalid(
                "APP_MAX_PAGE_SIZE",
                &max_page_size.to_string(),
                "at least APP_PAGE_SIZE",
            ));
        }
        if db_max_connections == 0 {
            return Err(invalid("APP_DB_MAX_CONNECTIONS", "0", "a positive integer"));
        }

        Ok(Self {
            database_url,
            storage,
            bind_addr,
            page_size,
            max_page_size,
            db_max_connections,
        })
    }

    pub fn pagination(&self) -> PageNumberPagination {
        PageNumberPagination::new(self.page_size).max_page_size(self.max_page_size)
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| invalid(key, &raw, expected)),
    }
}

fn invalid(key: &'static str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        expected,
    }
}
