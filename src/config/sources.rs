use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::{Path, PathBuf};

const CONFIG_ENV_VAR: &str = "ZOTBRIDGE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/zotbridge.toml";
const ENV_PREFIX: &str = "ZOTBRIDGE";
const ENV_SEPARATOR: &str = "__";
const DOTENV_FILE: &str = ".env";

/// Resolve the configuration file path (`ZOTBRIDGE_CONFIG` or the default)
pub fn config_path() -> PathBuf {
    env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    load_from_path(config_path())
}

/// Same as [`load`] with an explicit configuration file
pub fn load_from_path(config_path: PathBuf) -> Result<Config, ConfigError> {
    load_with_dotenv(config_path, Path::new(DOTENV_FILE))
}

/// Export `dotenv_path` into the environment, then load
///
/// Variables already set in the process environment are not overwritten.
pub fn load_with_dotenv(config_path: PathBuf, dotenv_path: &Path) -> Result<Config, ConfigError> {
    match dotenvy::from_path(dotenv_path) {
        Ok(()) => tracing::info!("Loaded environment from: {}", dotenv_path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring {}: {}", dotenv_path.display(), e),
    }

    load_from_sources(config_path)
}

/// Load configuration from a specific path and the environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // ZOTBRIDGE__LIBRARY__NAME -> library.name
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}
