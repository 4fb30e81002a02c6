//! xfee Configuration
//!
//! Configuration management and startup logging for the cross-chain fee scanner.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, ConfigLoadError};
pub use settings::{
	ChainSettings, ConfigValidationError, DiscoverySettings, EndpointSettings, LogFormat,
	LoggingSettings, PriceSettings, ProviderSettings, Settings, TimeoutSettings,
};
pub use startup_logger::{
	log_run_complete, log_run_plan, log_service_info, log_service_shutdown,
};
