use crate::config::types::{Config, DEFAULT_MAX_WORKERS};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// After parsing, the `MAX_WORKERS` environment variable (if set) overrides
/// the `max-workers` value from the file. Non-positive or unparsable worker
/// counts fall back to the default rather than failing the load.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use img_scout::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Sites configured: {}", config.sites.len());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let mut config: Config = toml::from_str(&content)?;

    // Environment override happens once, here at the boundary; the engine
    // only ever sees the resolved value
    config.engine.max_workers =
        resolve_max_workers(std::env::var("MAX_WORKERS").ok(), config.engine.max_workers);

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Resolves the worker pool size from an optional environment value and the
/// configured fallback
///
/// Resolution order:
/// 1. `env_value`, if present and a positive integer
/// 2. `configured`, if positive
/// 3. `DEFAULT_MAX_WORKERS`
///
/// Invalid values are logged at warn level and skipped, never fatal.
pub fn resolve_max_workers(env_value: Option<String>, configured: usize) -> usize {
    if let Some(raw) = env_value {
        match raw.trim().parse::<i64>() {
            Ok(n) if n > 0 => return n as usize,
            _ => {
                tracing::warn!(
                    "Ignoring invalid MAX_WORKERS value '{}', using {}",
                    raw,
                    if configured > 0 {
                        configured
                    } else {
                        DEFAULT_MAX_WORKERS
                    }
                );
            }
        }
    }

    if configured > 0 {
        configured
    } else {
        DEFAULT_MAX_WORKERS
    }
}
