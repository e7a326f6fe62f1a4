// src/utils/env.rs
use log::{debug, info, warn};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Loads the first `.env` file found; variables already set in the process
/// environment take precedence over file values.
pub fn load_env() {
    let env_paths = [".env", ".env.local", "../.env"];
    for path in env_paths.iter() {
        if Path::new(path).exists() {
            match dotenv::from_path(path) {
                Ok(()) => {
                    info!("Loaded environment variables from {}", path);
                    return;
                }
                Err(e) => warn!("Failed to load environment from {}: {}", path, e),
            }
        }
    }
    info!("No .env file found, using environment variables from system");
}

/// Reads `key` and parses it, falling back to `default` when the variable is
/// unset or unparsable.
pub fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => {
                debug!("{} = {}", key, value);
                value
            }
            Err(_) => {
                warn!(
                    "Could not parse {}='{}'; using default {}",
                    key, raw, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_parses_and_falls_back() {
        env::set_var("DOC_TEST_ENV_OR_VALUE", "2.5");
        env::set_var("DOC_TEST_ENV_OR_BROKEN", "abc");
        env::remove_var("DOC_TEST_ENV_OR_MISSING");

        assert_eq!(env_or("DOC_TEST_ENV_OR_VALUE", 1.0), 2.5);
        assert_eq!(env_or("DOC_TEST_ENV_OR_BROKEN", 7usize), 7);
        assert_eq!(env_or("DOC_TEST_ENV_OR_MISSING", 3u64), 3);

        env::remove_var("DOC_TEST_ENV_OR_VALUE");
        env::remove_var("DOC_TEST_ENV_OR_BROKEN");
    }
}
