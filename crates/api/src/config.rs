//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use checkout::FlushPolicy;

/// Where the shop state is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON document per key under the data directory.
    File,
    /// Process memory only; state is lost on exit.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend {other:?}")),
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `5000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `STORAGE`: `file` or `memory` (default: `file`)
/// - `DATA_DIR`: directory for the JSON documents (default: `"data"`)
/// - `PERSIST_ATTEMPTS`: flush attempts per checkout (default: `3`)
/// - `PERSIST_BACKOFF_MS`: pause between flush attempts (default: `50`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub storage: StorageBackend,
    pub data_dir: PathBuf,
    pub persist_attempts: u32,
    pub persist_backoff_ms: u64,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT").unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            storage: lookup("STORAGE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.storage),
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            persist_attempts: parse_var(&lookup, "PERSIST_ATTEMPTS")
                .unwrap_or(defaults.persist_attempts)
                .max(1),
            persist_backoff_ms: parse_var(&lookup, "PERSIST_BACKOFF_MS")
                .unwrap_or(defaults.persist_backoff_ms),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the flush retry policy for checkouts.
    pub fn flush_policy(&self) -> FlushPolicy {
        FlushPolicy::new(
            self.persist_attempts,
            Duration::from_millis(self.persist_backoff_ms),
        )
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
            storage: StorageBackend::File,
            data_dir: PathBuf::from("data"),
            persist_attempts: 3,
            persist_backoff_ms: 50,
        }
    }
}
