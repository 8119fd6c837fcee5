use std::time::Duration;

use serde::Deserialize;

/// Default per-statement timeout, milliseconds.
pub const DEFAULT_STATEMENT_TIMEOUT_MS: u64 = 1000;

/// Argon2id cost parameters. Tests inject cheaper values; production
/// keeps the defaults.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HashParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        // Same cost profile as argon2's own defaults.
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub statement_timeout: Duration,
    pub hash: HashParams,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            statement_timeout: Duration::from_millis(DEFAULT_STATEMENT_TIMEOUT_MS),
            hash: HashParams::default(),
        }
    }
}

impl StoreConfig {
    /// Build a config from the environment, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = HashParams::default();
        let statement_timeout = Duration::from_millis(
            std::env::var("DB_STATEMENT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_STATEMENT_TIMEOUT_MS),
        );
        let hash = HashParams {
            memory_kib: std::env::var("HASH_MEMORY_KIB")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.memory_kib),
            iterations: std::env::var("HASH_ITERATIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.iterations),
            parallelism: std::env::var("HASH_PARALLELISM")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.parallelism),
        };

        Self {
            statement_timeout,
            hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_one_second() {
        let config = StoreConfig::default();
        assert_eq!(config.statement_timeout, Duration::from_millis(1000));
    }
}
