//! Runtime configuration, read from environment variables.

use crate::error::{Error, Result};

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DATABASE_POOL_SIZE_VAR: &str = "DATABASE_POOL_SIZE";
/// When set (to anything), passwords are hashed with minimal argon2 cost.
pub const INSECURE_PASSWORD_HASHING_VAR: &str = "INSECURE_PASSWORD_HASHING";

pub const DEFAULT_POOL_SIZE: u32 = 8;
pub const IN_MEMORY_DATABASE_URL: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database path, or `:memory:`.
    pub database_url: String,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{DATABASE_URL_VAR} must be set")))?;

        let pool_size = match lookup(DATABASE_POOL_SIZE_VAR) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(Error::Config(format!(
                        "{DATABASE_POOL_SIZE_VAR} must be a positive integer, got {raw:?}"
                    )))
                }
            },
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_url,
            pool_size,
        })
    }

    /// A private in-memory database. Only one connection can see it.
    pub fn in_memory() -> Self {
        Self {
            database_url: IN_MEMORY_DATABASE_URL.to_string(),
            pool_size: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url == IN_MEMORY_DATABASE_URL
    }
}
