//! Configuration settings structures

use crate::configurable_value::{ConfigurableValue, ConfigurableValueError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use thiserror::Error;
use url::Url;
use xfee_types::math::parse_unsigned;
use xfee_types::num_bigint::BigUint;
use xfee_types::{ChainDescriptor, ChainRegistry, ProviderKind, ProviderRuntimeConfig};

/// Provider types the adapter factory can build
pub const KNOWN_PROVIDER_TYPES: [&str; 2] = ["hop", "openocean"];

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
	pub discovery: DiscoverySettings,
	/// Extra chains, or overrides of the built-in ones, keyed by chain name
	pub chains: HashMap<String, ChainSettings>,
	/// Liquidity subgraph endpoint per chain name
	pub subgraphs: HashMap<String, EndpointSettings>,
	pub prices: PriceSettings,
	/// Fee providers keyed by provider ID
	pub providers: HashMap<String, ProviderSettings>,
	pub timeouts: TimeoutSettings,
	pub logging: LoggingSettings,
}

/// What a discovery run scans and quotes
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DiscoverySettings {
	/// Chains to scan; the first is paired with each of the others
	pub chains: Vec<String>,
	/// Pool liquidity threshold as a base-10 integer string
	pub min_liquidity: String,
	/// Notional transfer size in USD
	pub usd_amount: Decimal,
	pub max_concurrent_quotes: usize,
	/// Quote only the top matches by first-chain rank
	pub max_tokens: Option<usize>,
}

/// Chain definition from configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChainSettings {
	pub chain_id: u64,
	/// Chain slug used by the bridging protocol
	pub bridging_protocol_id: String,
	/// Chain code used by the swap aggregator
	pub aggregator_chain_code: Option<String>,
	#[serde(default)]
	pub providers: Vec<ProviderKind>,
}

impl ChainSettings {
	pub fn to_descriptor(&self, name: &str) -> ChainDescriptor {
		let mut chain = ChainDescriptor::new(
			name.to_lowercase(),
			self.chain_id,
			self.bridging_protocol_id.clone(),
		);
		for kind in &self.providers {
			chain = chain.with_provider(*kind);
		}
		if let Some(code) = &self.aggregator_chain_code {
			chain = chain.with_aggregator_code(code.clone());
		}
		chain
	}
}

/// An HTTP endpoint with optional credentials
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EndpointSettings {
	pub endpoint: String,
	pub timeout_ms: Option<u64>,
	pub api_key: Option<ConfigurableValue>,
	pub api_key_header: Option<String>,
	pub headers: Option<HashMap<String, String>>,
}

impl EndpointSettings {
	pub fn new(endpoint: &str) -> Self {
		Self {
			endpoint: endpoint.to_string(),
			timeout_ms: None,
			api_key: None,
			api_key_header: None,
			headers: None,
		}
	}

	/// Runtime config for the HTTP boundary, resolving the API key
	pub fn runtime_config(
		&self,
		id: &str,
		default_timeout_ms: u64,
	) -> Result<ProviderRuntimeConfig, ConfigurableValueError> {
		runtime_config(
			id,
			&self.endpoint,
			self.timeout_ms.unwrap_or(default_timeout_ms),
			self.headers.as_ref(),
			self.api_key.as_ref(),
			self.api_key_header.as_deref(),
		)
	}
}

/// USD price API
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PriceSettings {
	pub endpoint: String,
	pub api_key: Option<ConfigurableValue>,
	pub api_key_header: Option<String>,
	/// Symbols per request
	pub batch_size: usize,
	/// Pause between batches in milliseconds
	pub batch_delay_ms: u64,
}

impl PriceSettings {
	pub fn batch_delay(&self) -> Duration {
		Duration::from_millis(self.batch_delay_ms)
	}

	pub fn runtime_config(
		&self,
		default_timeout_ms: u64,
	) -> Result<ProviderRuntimeConfig, ConfigurableValueError> {
		runtime_config(
			"prices",
			&self.endpoint,
			default_timeout_ms,
			None,
			self.api_key.as_ref(),
			self.api_key_header.as_deref(),
		)
	}
}

/// Individual fee provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderSettings {
	/// Adapter to build: `hop` or `openocean`
	pub provider_type: String,
	pub endpoint: String,
	#[serde(default = "default_enabled")]
	pub enabled: bool,
	/// Lower values are tried first
	#[serde(default)]
	pub priority: u32,
	pub timeout_ms: Option<u64>,
	pub api_key: Option<ConfigurableValue>,
	pub api_key_header: Option<String>,
	pub headers: Option<HashMap<String, String>>,
	/// Hop token whitelist override
	pub token_whitelist: Option<Vec<String>>,
	/// Hop slippage tolerance in percent
	pub slippage_percent: Option<Decimal>,
	/// Gas price passed to OpenOcean quotes
	pub gas_price: Option<String>,
}

fn default_enabled() -> bool {
	true
}

impl ProviderSettings {
	pub fn new(provider_type: &str, endpoint: &str, priority: u32) -> Self {
		Self {
			provider_type: provider_type.to_string(),
			endpoint: endpoint.to_string(),
			enabled: true,
			priority,
			timeout_ms: None,
			api_key: None,
			api_key_header: None,
			headers: None,
			token_whitelist: None,
			slippage_percent: None,
			gas_price: None,
		}
	}

	pub fn runtime_config(
		&self,
		provider_id: &str,
		default_timeout_ms: u64,
	) -> Result<ProviderRuntimeConfig, ConfigurableValueError> {
		runtime_config(
			provider_id,
			&self.endpoint,
			self.timeout_ms.unwrap_or(default_timeout_ms),
			self.headers.as_ref(),
			self.api_key.as_ref(),
			self.api_key_header.as_deref(),
		)
	}
}

fn runtime_config(
	id: &str,
	endpoint: &str,
	timeout_ms: u64,
	headers: Option<&HashMap<String, String>>,
	api_key: Option<&ConfigurableValue>,
	api_key_header: Option<&str>,
) -> Result<ProviderRuntimeConfig, ConfigurableValueError> {
	let mut config = ProviderRuntimeConfig::new(id, endpoint, timeout_ms);
	if let Some(headers) = headers {
		config = config.with_headers(headers.clone());
	}
	if let Some(api_key) = api_key {
		let header = api_key_header.unwrap_or("authorization");
		config = config.with_api_key(header, api_key.resolve_secret()?);
	}
	Ok(config)
}

/// Timeout configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TimeoutSettings {
	/// HTTP request timeout, unless an endpoint sets its own
	pub request_ms: u64,
	/// Upper bound for one provider quote call
	pub provider_call_ms: u64,
}

impl TimeoutSettings {
	pub fn provider_call(&self) -> Duration {
		Duration::from_millis(self.provider_call_ms)
	}
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	/// Include targets and thread IDs
	pub structured: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

/// Configuration that deserialized but cannot be run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
	#[error("discovery.chains needs at least two chains, got {count}")]
	NotEnoughChains { count: usize },

	#[error("discovery.chains lists {name} twice")]
	DuplicateChain { name: String },

	#[error("Unknown chain {name} in {field}")]
	UnknownChain { field: String, name: String },

	#[error("No subgraph endpoint configured for chain {chain}")]
	MissingSubgraph { chain: String },

	#[error("Invalid value for {field}: {reason}")]
	InvalidValue { field: String, reason: String },

	#[error("Invalid URL for {field}: {url} ({reason})")]
	InvalidUrl {
		field: String,
		url: String,
		reason: String,
	},

	#[error("Provider {provider_id} has unknown type {provider_type}")]
	UnknownProviderType {
		provider_id: String,
		provider_type: String,
	},

	#[error("No enabled fee providers configured")]
	NoProviders,
}

impl Default for DiscoverySettings {
	fn default() -> Self {
		Self {
			chains: vec!["ethereum".to_string(), "polygon".to_string()],
			min_liquidity: "1000000000000000000".to_string(),
			usd_amount: Decimal::from(1000),
			max_concurrent_quotes: 8,
			max_tokens: None,
		}
	}
}

impl Default for PriceSettings {
	fn default() -> Self {
		Self {
			endpoint: "https://min-api.cryptocompare.com".to_string(),
			api_key: None,
			api_key_header: None,
			batch_size: 3,
			batch_delay_ms: 250,
		}
	}
}

impl Default for TimeoutSettings {
	fn default() -> Self {
		Self {
			request_ms: 30_000,
			provider_call_ms: 30_000,
		}
	}
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

impl Default for Settings {
	fn default() -> Self {
		let mut providers = HashMap::new();
		providers.insert(
			"hop".to_string(),
			ProviderSettings::new("hop", "https://api.hop.exchange", 0),
		);
		providers.insert(
			"openocean".to_string(),
			ProviderSettings::new("openocean", "https://open-api.openocean.finance", 1),
		);

		Self {
			discovery: DiscoverySettings::default(),
			chains: HashMap::new(),
			subgraphs: HashMap::new(),
			prices: PriceSettings::default(),
			providers,
			timeouts: TimeoutSettings::default(),
			logging: LoggingSettings::default(),
		}
	}
}

impl Settings {
	/// Built-in chains with configured chains layered on top
	pub fn chain_registry(&self) -> ChainRegistry {
		let mut registry = ChainRegistry::with_defaults();
		// sorted so overrides apply deterministically
		let chains: BTreeMap<_, _> = self.chains.iter().collect();
		for (name, chain) in chains {
			registry.upsert(chain.to_descriptor(name));
		}
		registry
	}

	/// Enabled providers in the order they are tried
	pub fn enabled_providers(&self) -> Vec<(String, ProviderSettings)> {
		let mut providers: Vec<(String, ProviderSettings)> = self
			.providers
			.iter()
			.filter(|(_, config)| config.enabled)
			.map(|(id, config)| (id.clone(), config.clone()))
			.collect();
		providers.sort_by(|(a_id, a), (b_id, b)| a.priority.cmp(&b.priority).then(a_id.cmp(b_id)));
		providers
	}

	/// Subgraph endpoint for a chain, matched case-insensitively
	pub fn subgraph_for(&self, chain: &str) -> Option<&EndpointSettings> {
		self.subgraphs
			.iter()
			.find(|(name, _)| name.eq_ignore_ascii_case(chain))
			.map(|(_, endpoint)| endpoint)
	}

	pub fn min_liquidity(&self) -> Result<BigUint, ConfigValidationError> {
		parse_unsigned(&self.discovery.min_liquidity).map_err(|e| {
			ConfigValidationError::InvalidValue {
				field: "discovery.min_liquidity".to_string(),
				reason: e.to_string(),
			}
		})
	}

	/// Check everything a discovery run depends on
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		let discovery = &self.discovery;
		if discovery.chains.len() < 2 {
			return Err(ConfigValidationError::NotEnoughChains {
				count: discovery.chains.len(),
			});
		}

		let registry = self.chain_registry();
		let mut seen: Vec<String> = Vec::new();
		for name in &discovery.chains {
			let key = name.to_lowercase();
			if seen.contains(&key) {
				return Err(ConfigValidationError::DuplicateChain { name: name.clone() });
			}
			if !registry.contains(name) {
				return Err(ConfigValidationError::UnknownChain {
					field: "discovery.chains".to_string(),
					name: name.clone(),
				});
			}
			if self.subgraph_for(name).is_none() {
				return Err(ConfigValidationError::MissingSubgraph {
					chain: name.clone(),
				});
			}
			seen.push(key);
		}

		self.min_liquidity()?;

		if discovery.usd_amount <= Decimal::ZERO {
			return Err(ConfigValidationError::InvalidValue {
				field: "discovery.usd_amount".to_string(),
				reason: "must be positive".to_string(),
			});
		}
		if discovery.max_concurrent_quotes == 0 {
			return Err(ConfigValidationError::InvalidValue {
				field: "discovery.max_concurrent_quotes".to_string(),
				reason: "must be at least 1".to_string(),
			});
		}
		if self.prices.batch_size == 0 {
			return Err(ConfigValidationError::InvalidValue {
				field: "prices.batch_size".to_string(),
				reason: "must be at least 1".to_string(),
			});
		}

		validate_url("prices.endpoint", &self.prices.endpoint)?;
		for (chain, subgraph) in &self.subgraphs {
			validate_url(&format!("subgraphs.{}.endpoint", chain), &subgraph.endpoint)?;
		}

		let enabled = self.enabled_providers();
		if enabled.is_empty() {
			return Err(ConfigValidationError::NoProviders);
		}
		for (provider_id, provider) in &enabled {
			if !KNOWN_PROVIDER_TYPES.contains(&provider.provider_type.as_str()) {
				return Err(ConfigValidationError::UnknownProviderType {
					provider_id: provider_id.clone(),
					provider_type: provider.provider_type.clone(),
				});
			}
			validate_url(
				&format!("providers.{}.endpoint", provider_id),
				&provider.endpoint,
			)?;
			if let Some(slippage) = provider.slippage_percent {
				if slippage < Decimal::ZERO || slippage > Decimal::ONE_HUNDRED {
					return Err(ConfigValidationError::InvalidValue {
						field: format!("providers.{}.slippage_percent", provider_id),
						reason: format!("{} is outside 0-100", slippage),
					});
				}
			}
		}

		if self.timeouts.provider_call_ms == 0 || self.timeouts.request_ms == 0 {
			return Err(ConfigValidationError::InvalidValue {
				field: "timeouts".to_string(),
				reason: "timeouts must be positive".to_string(),
			});
		}

		Ok(())
	}
}

fn validate_url(field: &str, value: &str) -> Result<(), ConfigValidationError> {
	let parsed = Url::parse(value).map_err(|e| ConfigValidationError::InvalidUrl {
		field: field.to_string(),
		url: value.to_string(),
		reason: e.to_string(),
	})?;
	match parsed.scheme() {
		"http" | "https" => Ok(()),
		scheme => Err(ConfigValidationError::InvalidUrl {
			field: field.to_string(),
			url: value.to_string(),
			reason: format!("unsupported scheme {}", scheme),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn runnable() -> Settings {
		let mut settings = Settings::default();
		settings.subgraphs.insert(
			"ethereum".to_string(),
			EndpointSettings::new("https://gateway.example/subgraphs/eth"),
		);
		settings.subgraphs.insert(
			"Polygon".to_string(),
			EndpointSettings::new("https://gateway.example/subgraphs/polygon"),
		);
		settings
	}

	#[test]
	fn test_defaults_need_subgraphs() {
		assert_eq!(
			Settings::default().validate(),
			Err(ConfigValidationError::MissingSubgraph {
				chain: "ethereum".to_string()
			})
		);
		assert_eq!(runnable().validate(), Ok(()));
	}

	#[test]
	fn test_provider_order() {
		let mut settings = runnable();
		settings.providers.get_mut("openocean").unwrap().priority = 0;
		settings
			.providers
			.insert("hop-backup".to_string(), ProviderSettings::new("hop", "https://hop.example", 5));
		settings.providers.get_mut("hop").unwrap().enabled = false;

		let ids: Vec<String> = settings
			.enabled_providers()
			.into_iter()
			.map(|(id, _)| id)
			.collect();
		assert_eq!(ids, vec!["openocean", "hop-backup"]);
	}

	#[test]
	fn test_validation_errors() {
		let mut settings = runnable();
		settings.discovery.chains = vec!["ethereum".to_string()];
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::NotEnoughChains { count: 1 })
		));

		let mut settings = runnable();
		settings.discovery.chains = vec!["ethereum".to_string(), "Ethereum".to_string()];
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::DuplicateChain { .. })
		));

		let mut settings = runnable();
		settings.discovery.chains[1] = "solana".to_string();
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::UnknownChain { .. })
		));

		let mut settings = runnable();
		settings.discovery.min_liquidity = "12abc".to_string();
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::InvalidValue { field, .. }) if field == "discovery.min_liquidity"
		));

		let mut settings = runnable();
		settings.providers.get_mut("hop").unwrap().provider_type = "lifi".to_string();
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::UnknownProviderType { .. })
		));

		let mut settings = runnable();
		settings.prices.endpoint = "ftp://prices.example".to_string();
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::InvalidUrl { .. })
		));

		let mut settings = runnable();
		for provider in settings.providers.values_mut() {
			provider.enabled = false;
		}
		assert_eq!(settings.validate(), Err(ConfigValidationError::NoProviders));
	}

	#[test]
	fn test_configured_chain_extends_registry() {
		let mut settings = runnable();
		settings.chains.insert(
			"Linea".to_string(),
			ChainSettings {
				chain_id: 59144,
				bridging_protocol_id: "linea".to_string(),
				aggregator_chain_code: Some("linea".to_string()),
				providers: vec![ProviderKind::Hop],
			},
		);
		settings.discovery.chains = vec!["ethereum".to_string(), "linea".to_string()];
		settings.subgraphs.insert(
			"linea".to_string(),
			EndpointSettings::new("https://gateway.example/subgraphs/linea"),
		);

		let registry = settings.chain_registry();
		let linea = registry.get("linea").unwrap();
		assert_eq!(linea.chain_id, 59144);
		assert!(linea.supports(ProviderKind::Hop));
		assert!(linea.supports(ProviderKind::SwapAggregator));
		assert_eq!(settings.validate(), Ok(()));
	}

	#[test]
	fn test_runtime_config_resolves_api_key() {
		let mut provider = ProviderSettings::new("openocean", "https://open-api.openocean.finance/", 1);
		provider.api_key = Some(ConfigurableValue::from_plain("oo-key"));
		provider.api_key_header = Some("apikey".to_string());

		let config = provider.runtime_config("openocean", 12_000).unwrap();
		assert_eq!(config.timeout_ms, 12_000);
		assert_eq!(config.api_key_header, "apikey");
		assert_eq!(config.api_key.unwrap().expose_secret(), "oo-key");

		provider.api_key = Some(ConfigurableValue::from_env("XFEE_TEST_MISSING_OO_KEY"));
		assert!(provider.runtime_config("openocean", 12_000).is_err());
	}
}
