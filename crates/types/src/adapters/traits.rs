//! Core fee provider trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::{AdapterResult, ProviderInfo, ProviderQuote, ProviderQuoteRequest, ProviderRuntimeConfig};
use crate::models::{ChainDescriptor, ProviderKind};

/// Core trait for fee quote provider implementations
///
/// Implementations hold no per-request state; endpoint, timeout and credentials arrive
/// with each call through the runtime configuration.
#[async_trait]
pub trait FeeProvider: Send + Sync + Debug {
	/// Get provider information
	/// This is the only required accessor - the others have default implementations
	fn provider_info(&self) -> &ProviderInfo;

	/// Get provider ID (for registration and attempt records)
	fn id(&self) -> &str {
		&self.provider_info().provider_id
	}

	/// Get human-readable name for this provider
	fn name(&self) -> &str {
		&self.provider_info().name
	}

	/// Provider family, used for chain capability checks and result status
	fn kind(&self) -> ProviderKind {
		self.provider_info().kind
	}

	/// Whether the provider can quote this token symbol at all
	fn supports_token(&self, _symbol: &str) -> bool {
		true
	}

	/// Whether the chain advertises this provider
	fn supports_chain(&self, chain: &ChainDescriptor) -> bool {
		chain.supports(self.kind())
	}

	/// Quote a cross-chain transfer of `request.amount_raw`
	async fn quote_fee(
		&self,
		request: &ProviderQuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderQuote>;

	/// Health check for the provider API
	async fn health_check(&self, config: &ProviderRuntimeConfig) -> AdapterResult<bool>;
}
