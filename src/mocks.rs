//! Mock providers and in-memory sources for demos and testing
//!
//! Everything here is deterministic and makes no network calls.

use std::collections::HashMap;

use async_trait::async_trait;
use num_bigint::BigUint;
use rust_decimal::Decimal;
use xfee_types::{
	AdapterResult, ChainDescriptor, FeeProvider, PoolRecord, PoolSource, PoolToken, PriceSource,
	ProviderInfo, ProviderKind, ProviderQuote, ProviderQuoteRequest, ProviderRuntimeConfig,
	SourceResult,
};

/// Provider charging a fixed share of every transfer
#[derive(Debug, Clone)]
pub struct MockFeeProvider {
	info: ProviderInfo,
	fee_basis_points: u32,
}

impl MockFeeProvider {
	/// Bridge-style provider reporting a total fee
	pub fn bridge(id: &str, fee_basis_points: u32) -> Self {
		Self {
			info: ProviderInfo::new(id, format!("Mock {}", id), ProviderKind::Hop, "1.0.0"),
			fee_basis_points,
		}
	}

	/// Aggregator-style provider reporting the amount received
	pub fn aggregator(id: &str, fee_basis_points: u32) -> Self {
		Self {
			info: ProviderInfo::new(
				id,
				format!("Mock {}", id),
				ProviderKind::SwapAggregator,
				"1.0.0",
			),
			fee_basis_points,
		}
	}

	fn fee_for(&self, amount_raw: &BigUint) -> BigUint {
		amount_raw * self.fee_basis_points / 10_000u32
	}
}

#[async_trait]
impl FeeProvider for MockFeeProvider {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn quote_fee(
		&self,
		request: &ProviderQuoteRequest,
		_config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderQuote> {
		let fee_raw = self.fee_for(&request.amount_raw);
		Ok(match self.kind() {
			ProviderKind::Hop => ProviderQuote::TotalFee { fee_raw },
			ProviderKind::SwapAggregator => ProviderQuote::OutputAmount {
				amount_out_raw: &request.amount_raw - fee_raw,
			},
		})
	}

	async fn health_check(&self, _config: &ProviderRuntimeConfig) -> AdapterResult<bool> {
		Ok(true)
	}
}

/// Pools per chain, filtered by the liquidity threshold like the subgraph query
#[derive(Debug, Clone, Default)]
pub struct InMemoryPoolSource {
	pools: HashMap<String, Vec<PoolRecord>>,
}

impl InMemoryPoolSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_pools(mut self, chain: &str, pools: Vec<PoolRecord>) -> Self {
		self.pools.entry(chain.to_lowercase()).or_default().extend(pools);
		self
	}
}

#[async_trait]
impl PoolSource for InMemoryPoolSource {
	async fn fetch_pools(
		&self,
		chain: &ChainDescriptor,
		min_liquidity: &BigUint,
	) -> SourceResult<Vec<PoolRecord>> {
		Ok(self
			.pools
			.get(&chain.key())
			.map(|pools| {
				pools
					.iter()
					.filter(|pool| &pool.liquidity > min_liquidity)
					.cloned()
					.collect()
			})
			.unwrap_or_default())
	}
}

/// Fixed USD prices by upper-cased symbol, the same on every chain
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSource {
	prices: HashMap<String, Decimal>,
}

impl InMemoryPriceSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_price(mut self, symbol: &str, price: Decimal) -> Self {
		self.prices.insert(symbol.to_uppercase(), price);
		self
	}
}

#[async_trait]
impl PriceSource for InMemoryPriceSource {
	async fn fetch_prices(
		&self,
		symbols: &[String],
		_chain: &ChainDescriptor,
	) -> SourceResult<HashMap<String, Decimal>> {
		Ok(symbols
			.iter()
			.filter_map(|symbol| {
				let key = symbol.to_uppercase();
				self.prices.get(&key).map(|price| (key, *price))
			})
			.collect())
	}
}

/// Pool between two tokens with zero volume; addresses are derived from the symbols
pub fn mock_pool(id: &str, liquidity: u64, symbol0: (&str, u8), symbol1: (&str, u8)) -> PoolRecord {
	let token = |(symbol, decimals): (&str, u8)| {
		PoolToken::new(
			format!("0x{}", symbol.to_lowercase()),
			symbol,
			symbol,
			decimals,
		)
	};
	PoolRecord::new(
		id,
		BigUint::from(liquidity),
		Decimal::ZERO,
		token(symbol0),
		token(symbol1),
	)
}
