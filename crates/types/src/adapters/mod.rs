//! Fee provider domain model

use num_bigint::BigUint;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub mod errors;
pub mod traits;

pub use errors::{AdapterError, AdapterFactoryError, ProviderFailureKind};
pub use traits::FeeProvider;

use crate::models::{ChainDescriptor, ProviderKind, SecretString};

/// Result type for provider operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Static description of a provider implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
	/// Unique identifier for the provider
	pub provider_id: String,

	/// Human-readable name, reported on quoted fees
	pub name: String,

	/// Provider family
	pub kind: ProviderKind,

	/// Version of the provider implementation
	pub version: String,
}

impl ProviderInfo {
	pub fn new(
		provider_id: impl Into<String>,
		name: impl Into<String>,
		kind: ProviderKind,
		version: impl Into<String>,
	) -> Self {
		Self {
			provider_id: provider_id.into(),
			name: name.into(),
			kind,
			version: version.into(),
		}
	}
}

/// Minimal runtime configuration needed by providers and boundary clients
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRuntimeConfig {
	/// Provider or source instance identifier
	pub provider_id: String,

	/// Base URL of the API
	pub endpoint: String,

	/// Timeout for requests in milliseconds
	pub timeout_ms: u64,

	/// Optional custom HTTP headers for requests
	pub headers: Option<HashMap<String, String>>,

	/// Optional API key, sent in `api_key_header`
	pub api_key: Option<SecretString>,

	/// Header carrying the API key
	pub api_key_header: String,
}

impl ProviderRuntimeConfig {
	/// Create a new runtime config
	pub fn new(provider_id: impl Into<String>, endpoint: impl Into<String>, timeout_ms: u64) -> Self {
		Self {
			provider_id: provider_id.into(),
			endpoint: endpoint.into().trim_end_matches('/').to_string(),
			timeout_ms,
			headers: None,
			api_key: None,
			api_key_header: "authorization".to_string(),
		}
	}

	/// Create runtime config with optional headers
	pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
		self.headers = Some(headers);
		self
	}

	pub fn with_api_key(mut self, header: impl Into<String>, key: SecretString) -> Self {
		self.api_key_header = header.into();
		self.api_key = Some(key).filter(|key| !key.is_empty());
		self
	}

	/// Join a path onto the endpoint; an empty path is the endpoint itself
	pub fn url(&self, path: &str) -> String {
		let path = path.trim_start_matches('/');
		if path.is_empty() {
			return self.endpoint.clone();
		}
		format!("{}/{}", self.endpoint, path)
	}
}

/// A single provider call: move `amount_raw` of a token from one chain to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuoteRequest {
	pub symbol: String,
	pub source_chain: ChainDescriptor,
	pub dest_chain: ChainDescriptor,
	/// Token contract on the source chain
	pub source_token_address: Option<String>,
	/// Token contract on the destination chain
	pub dest_token_address: Option<String>,
	/// Principal in minimal units
	pub amount_raw: BigUint,
	/// Principal in whole tokens, for APIs that take human amounts
	pub amount_human: Decimal,
	pub decimals: u8,
}

/// What a provider reports for a transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderQuote {
	/// Total fee in minimal units
	TotalFee { fee_raw: BigUint },
	/// Amount received in minimal units; the fee is the shortfall
	OutputAmount { amount_out_raw: BigUint },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_runtime_config_url_joining() {
		let config = ProviderRuntimeConfig::new("hop", "https://api.hop.exchange/", 30_000);
		assert_eq!(config.endpoint, "https://api.hop.exchange");
		assert_eq!(config.url("/v1/quote"), "https://api.hop.exchange/v1/quote");
		assert_eq!(config.url("v1/quote"), "https://api.hop.exchange/v1/quote");
		assert_eq!(config.url(""), "https://api.hop.exchange");
	}

	#[test]
	fn test_runtime_config_ignores_blank_api_key() {
		let config = ProviderRuntimeConfig::new("prices", "https://example.com", 1_000)
			.with_api_key("authorization", SecretString::from(""));
		assert!(config.api_key.is_none());

		let config = ProviderRuntimeConfig::new("prices", "https://example.com", 1_000)
			.with_api_key("authorization", SecretString::from("Apikey abc"));
		assert_eq!(config.api_key.unwrap().expose_secret(), "Apikey abc");
	}
}
