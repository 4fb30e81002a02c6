//! Configuration loading utilities

use crate::settings::{ConfigValidationError, Settings};
use config::{Config, ConfigError, Environment, File};
use thiserror::Error;
use tracing::debug;

/// Default config file, without extension (`.toml`, `.json` and `.yaml` are all accepted)
pub const DEFAULT_CONFIG_PATH: &str = "config/config";
/// Prefix of environment overrides, e.g. `XFEE_DISCOVERY__USD_AMOUNT=500`
pub const ENV_PREFIX: &str = "XFEE";

#[derive(Error, Debug)]
pub enum ConfigLoadError {
	#[error("Failed to read configuration: {0}")]
	Source(#[from] ConfigError),

	#[error("Invalid configuration: {0}")]
	Validation(#[from] ConfigValidationError),
}

/// Load and validate configuration from the default file and the environment
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	let path = std::env::var("XFEE_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
	load_config_from(&path)
}

/// Load and validate configuration from `path` (optional) and the environment
pub fn load_config_from(path: &str) -> Result<Settings, ConfigLoadError> {
	debug!("Loading configuration from {} and {}_* variables", path, ENV_PREFIX);

	let settings: Settings = Config::builder()
		.add_source(File::with_name(path).required(false))
		.add_source(
			Environment::with_prefix(ENV_PREFIX)
				.prefix_separator("_")
				.separator("__")
				.try_parsing(true)
				.list_separator(",")
				.with_list_parse_key("discovery.chains"),
		)
		.build()?
		.try_deserialize()?;

	settings.validate()?;
	Ok(settings)
}
