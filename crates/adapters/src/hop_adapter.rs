//! Hop bridge adapter
//!
//! Primary provider. Quotes come from `GET /v1/quote` and carry an authoritative total
//! fee in minimal units. Only whitelisted token symbols are routed here.

use async_trait::async_trait;
use num_bigint::BigUint;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};
use xfee_types::{
	AdapterError, AdapterResult, FeeProvider, ProviderInfo, ProviderKind, ProviderQuote,
	ProviderQuoteRequest, ProviderRuntimeConfig,
};

use crate::amount::RawAmount;
use crate::http_transport::HttpTransport;

/// Symbols the Hop API officially supports
pub const DEFAULT_HOP_TOKENS: &[&str] = &[
	"USDC", "USDC.e", "USDT", "DAI", "ETH", "MATIC", "HOP", "SNX", "sUSD", "rETH", "MAGIC",
];

// ================================
// HOP API MODELS
// ================================

/// Hop `/v1/quote` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HopQuoteResponse {
	pub amount_in: RawAmount,
	#[serde(default)]
	pub total_fee: Option<RawAmount>,
	#[serde(default)]
	pub estimated_received: Option<RawAmount>,
	#[serde(default)]
	pub bonder_fee: Option<RawAmount>,
	#[serde(default)]
	pub destination_tx_fee: Option<RawAmount>,
	#[serde(default)]
	pub amount_out_min: Option<RawAmount>,
}

impl HopQuoteResponse {
	/// Total fee in minimal units
	///
	/// Falls back to `amountIn - estimatedReceived` when `totalFee` is absent.
	pub fn fee_raw(&self) -> AdapterResult<BigUint> {
		if let Some(total_fee) = &self.total_fee {
			return total_fee.to_biguint("totalFee");
		}

		match &self.estimated_received {
			Some(received) => {
				let amount_in = self.amount_in.to_biguint("amountIn")?;
				let received = received.to_biguint("estimatedReceived")?;
				if received > amount_in {
					Ok(BigUint::default())
				} else {
					Ok(amount_in - received)
				}
			}
			None => Err(AdapterError::invalid_response(
				"Hop quote has neither totalFee nor estimatedReceived",
			)),
		}
	}
}

/// Hop bridge fee provider
#[derive(Debug)]
pub struct HopAdapter {
	info: ProviderInfo,
	/// Upper-cased symbol to the casing the API expects
	whitelist: BTreeMap<String, String>,
	slippage_percent: Decimal,
	transport: Arc<dyn HttpTransport>,
}

impl HopAdapter {
	pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
		Self::with_whitelist(transport, DEFAULT_HOP_TOKENS.iter().copied())
	}

	pub fn with_whitelist<I, S>(transport: Arc<dyn HttpTransport>, tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let whitelist = tokens
			.into_iter()
			.map(|symbol| {
				let symbol = symbol.as_ref().trim().to_string();
				(symbol.to_uppercase(), symbol)
			})
			.filter(|(key, _)| !key.is_empty())
			.collect();

		Self {
			info: ProviderInfo::new("hop", "Hop", ProviderKind::Hop, "1.0.0"),
			whitelist,
			// 0.5%
			slippage_percent: Decimal::new(5, 1),
			transport,
		}
	}

	pub fn with_slippage(mut self, slippage_percent: Decimal) -> Self {
		self.slippage_percent = slippage_percent;
		self
	}

	/// Token symbol in the casing the Hop API expects
	fn api_symbol(&self, symbol: &str) -> Option<&str> {
		self.whitelist
			.get(&symbol.trim().to_uppercase())
			.map(String::as_str)
	}

	/// Map an HTTP rejection to a route failure when Hop refused the transfer itself
	fn classify(error: AdapterError) -> AdapterError {
		match error {
			AdapterError::HttpStatusError {
				status_code,
				reason,
			} if (400..500).contains(&status_code) && status_code != 429 => {
				AdapterError::UnsupportedRoute { reason }
			}
			other => other,
		}
	}
}

#[async_trait]
impl FeeProvider for HopAdapter {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	fn supports_token(&self, symbol: &str) -> bool {
		self.api_symbol(symbol).is_some()
	}

	async fn quote_fee(
		&self,
		request: &ProviderQuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderQuote> {
		let token = self
			.api_symbol(&request.symbol)
			.ok_or_else(|| AdapterError::UnsupportedToken {
				symbol: request.symbol.clone(),
				provider_id: self.id().to_string(),
			})?;

		for chain in [&request.source_chain, &request.dest_chain] {
			if !self.supports_chain(chain) {
				return Err(AdapterError::UnsupportedChain {
					chain: chain.name.clone(),
					provider_id: self.id().to_string(),
				});
			}
		}

		let query = vec![
			("amount".to_string(), request.amount_raw.to_string()),
			("token".to_string(), token.to_string()),
			(
				"fromChain".to_string(),
				request.source_chain.bridging_protocol_id.clone(),
			),
			(
				"toChain".to_string(),
				request.dest_chain.bridging_protocol_id.clone(),
			),
			("slippage".to_string(), self.slippage_percent.normalize().to_string()),
		];

		debug!(
			"Hop quote for {} {} {} -> {} via {}",
			request.amount_raw,
			token,
			request.source_chain.bridging_protocol_id,
			request.dest_chain.bridging_protocol_id,
			config.provider_id
		);

		let body = self
			.transport
			.get_json(config, "v1/quote", &query)
			.await
			.map_err(Self::classify)?;

		if let Some(message) = body.get("error").and_then(|e| e.as_str()) {
			return Err(AdapterError::UnsupportedRoute {
				reason: message.to_string(),
			});
		}

		let quote: HopQuoteResponse = serde_json::from_value(body)?;
		let fee_raw = quote.fee_raw()?;

		debug!("Hop total fee for {}: {}", token, fee_raw);
		Ok(ProviderQuote::TotalFee { fee_raw })
	}

	async fn health_check(&self, config: &ProviderRuntimeConfig) -> AdapterResult<bool> {
		match self
			.transport
			.get_json(config, "v1/available-routes", &[])
			.await
		{
			Ok(routes) => Ok(routes.is_array() || routes.is_object()),
			Err(AdapterError::HttpStatusError {
				status_code,
				reason,
			}) => {
				warn!(
					"Hop health check failed for {}: HTTP {} {}",
					config.provider_id, status_code, reason
				);
				Ok(false)
			}
			Err(e) => Err(e),
		}
	}
}
