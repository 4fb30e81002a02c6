//! xfee Adapters
//!
//! Fee provider adapters and HTTP boundary clients for the cross-chain fee scanner.

pub mod amount;
pub mod client_cache;
pub mod hop_adapter;
pub mod http_transport;
pub mod openocean_adapter;
pub mod price_api_client;
pub mod subgraph_client;

#[cfg(test)]
pub(crate) mod test_utils;

pub use client_cache::{ClientCache, ClientConfig};
pub use hop_adapter::{HopAdapter, DEFAULT_HOP_TOKENS};
pub use http_transport::{HttpTransport, ReqwestTransport};
pub use openocean_adapter::OpenOceanAdapter;
pub use price_api_client::PriceApiClient;
pub use subgraph_client::SubgraphPoolSource;
pub use xfee_types::{AdapterError, AdapterResult, FeeProvider};

use rust_decimal::Decimal;
use std::sync::Arc;

/// Provider-specific knobs the factory understands
#[derive(Debug, Clone, Default)]
pub struct ProviderOptions {
	/// Token whitelist override (Hop)
	pub token_whitelist: Option<Vec<String>>,
	/// Slippage tolerance in percent (Hop)
	pub slippage_percent: Option<Decimal>,
	/// Gas price passed to quote requests (OpenOcean)
	pub gas_price: Option<String>,
}

/// Builds fee providers from their configured type
#[derive(Debug, Default)]
pub struct AdapterFactory;

impl AdapterFactory {
	/// Build a provider by type name (`hop`, `openocean`)
	pub fn create_provider(
		provider_type: &str,
		options: &ProviderOptions,
		transport: Arc<dyn HttpTransport>,
	) -> AdapterResult<Arc<dyn FeeProvider>> {
		match provider_type {
			"hop" => {
				let mut adapter = match &options.token_whitelist {
					Some(tokens) => HopAdapter::with_whitelist(transport, tokens),
					None => HopAdapter::new(transport),
				};
				if let Some(slippage) = options.slippage_percent {
					adapter = adapter.with_slippage(slippage);
				}
				Ok(Arc::new(adapter))
			}
			"openocean" => {
				let mut adapter = OpenOceanAdapter::new(transport);
				if let Some(gas_price) = &options.gas_price {
					adapter = adapter.with_gas_price(gas_price.clone());
				}
				Ok(Arc::new(adapter))
			}
			_ => Err(AdapterError::UnsupportedProvider(provider_type.to_string())),
		}
	}
}
