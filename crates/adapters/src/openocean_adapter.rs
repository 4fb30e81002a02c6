//! OpenOcean swap aggregator adapter
//!
//! Fallback provider. There is no bridge fee endpoint, so the fee is estimated from the
//! output of a swap quote between the two token contracts on the source chain. Both
//! contracts must appear in the chain's token list before a quote is requested.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use xfee_types::{
	AdapterError, AdapterResult, ChainDescriptor, FeeProvider, ProviderInfo, ProviderKind,
	ProviderQuote, ProviderQuoteRequest, ProviderRuntimeConfig,
};

use crate::amount::RawAmount;
use crate::http_transport::HttpTransport;

const DEFAULT_GAS_PRICE: &str = "1";
const HEALTH_CHAIN_CODE: &str = "eth";

// ================================
// OPENOCEAN API MODELS
// ================================

/// Envelope shared by OpenOcean v3 endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOceanEnvelope<T> {
	pub code: u16,
	pub data: Option<T>,
	pub message: Option<String>,
	pub error: Option<String>,
}

impl<T> OpenOceanEnvelope<T> {
	/// Payload of a successful response
	fn into_data(self, endpoint: &str) -> AdapterResult<T> {
		if self.code != 200 {
			return Err(AdapterError::ProviderError {
				code: self.code.to_string(),
				message: self
					.error
					.or(self.message)
					.unwrap_or_else(|| format!("{} failed", endpoint)),
			});
		}
		self.data.ok_or_else(|| AdapterError::InvalidResponse {
			reason: format!("OpenOcean {} response has no data", endpoint),
		})
	}
}

/// Entry of `/v3/{chain}/tokenList`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOceanToken {
	pub address: String,
	#[serde(default)]
	pub symbol: Option<String>,
	#[serde(default)]
	pub decimals: Option<u8>,
}

/// Payload of `/v3/{chain}/quote`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOceanQuote {
	pub out_amount: RawAmount,
	#[serde(default)]
	pub in_amount: Option<RawAmount>,
	#[serde(default)]
	pub estimated_gas: Option<Value>,
}

/// OpenOcean swap aggregator fee provider
#[derive(Debug)]
pub struct OpenOceanAdapter {
	info: ProviderInfo,
	gas_price: String,
	transport: Arc<dyn HttpTransport>,
}

impl OpenOceanAdapter {
	pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
		Self {
			info: ProviderInfo::new(
				"openocean",
				"OpenOcean",
				ProviderKind::SwapAggregator,
				"3.0.0",
			),
			gas_price: DEFAULT_GAS_PRICE.to_string(),
			transport,
		}
	}

	pub fn with_gas_price(mut self, gas_price: impl Into<String>) -> Self {
		self.gas_price = gas_price.into();
		self
	}

	fn chain_code<'a>(&self, chain: &'a ChainDescriptor) -> AdapterResult<&'a str> {
		chain
			.aggregator_chain_code
			.as_deref()
			.filter(|_| self.supports_chain(chain))
			.ok_or_else(|| AdapterError::UnsupportedChain {
				chain: chain.name.clone(),
				provider_id: self.id().to_string(),
			})
	}

	/// Lower-cased addresses listed on the chain
	async fn token_addresses(
		&self,
		chain_code: &str,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<Vec<String>> {
		let body = self
			.transport
			.get_json(config, &format!("v3/{}/tokenList", chain_code), &[])
			.await?;
		let envelope: OpenOceanEnvelope<Vec<OpenOceanToken>> = serde_json::from_value(body)?;
		let tokens = envelope.into_data("tokenList")?;

		debug!(
			"OpenOcean token list for {} has {} entries",
			chain_code,
			tokens.len()
		);
		Ok(tokens
			.into_iter()
			.map(|token| token.address.to_lowercase())
			.collect())
	}
}

#[async_trait]
impl FeeProvider for OpenOceanAdapter {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn quote_fee(
		&self,
		request: &ProviderQuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderQuote> {
		let chain_code = self.chain_code(&request.source_chain)?;
		self.chain_code(&request.dest_chain)?;

		let (in_token, out_token) = match (
			request.source_token_address.as_deref(),
			request.dest_token_address.as_deref(),
		) {
			(Some(source), Some(dest)) => (source, dest),
			_ => {
				return Err(AdapterError::UnsupportedRoute {
					reason: format!(
						"{} has no contract address on one side of {} -> {}",
						request.symbol, request.source_chain.name, request.dest_chain.name
					),
				})
			}
		};

		let listed = self.token_addresses(chain_code, config).await?;
		for leg in [in_token, out_token] {
			if !listed.contains(&leg.to_lowercase()) {
				return Err(AdapterError::UnsupportedRoute {
					reason: format!("{} is not in the OpenOcean {} token list", leg, chain_code),
				});
			}
		}

		let query = vec![
			("inTokenAddress".to_string(), in_token.to_string()),
			("outTokenAddress".to_string(), out_token.to_string()),
			("amount".to_string(), request.amount_human.normalize().to_string()),
			("gasPrice".to_string(), self.gas_price.clone()),
		];

		debug!(
			"OpenOcean quote for {} {} on {}",
			request.amount_human, request.symbol, chain_code
		);

		let body = self
			.transport
			.get_json(config, &format!("v3/{}/quote", chain_code), &query)
			.await?;
		let envelope: OpenOceanEnvelope<OpenOceanQuote> = serde_json::from_value(body)?;
		let quote = envelope.into_data("quote")?;
		let amount_out_raw = quote.out_amount.to_biguint("outAmount")?;

		debug!("OpenOcean output for {}: {}", request.symbol, amount_out_raw);
		Ok(ProviderQuote::OutputAmount { amount_out_raw })
	}

	async fn health_check(&self, config: &ProviderRuntimeConfig) -> AdapterResult<bool> {
		let path = format!("v3/{}/gasPrice", HEALTH_CHAIN_CODE);
		match self.transport.get_json(config, &path, &[]).await {
			Ok(body) => Ok(body.get("code").and_then(Value::as_u64) == Some(200)),
			Err(AdapterError::HttpStatusError {
				status_code,
				reason,
			}) => {
				warn!(
					"OpenOcean health check failed for {}: HTTP {} {}",
					config.provider_id, status_code, reason
				);
				Ok(false)
			}
			Err(e) => Err(e),
		}
	}
}
