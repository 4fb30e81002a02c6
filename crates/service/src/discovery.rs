//! End-to-end discovery run
//!
//! Fetches pools on every configured chain, ranks and intersects tokens by symbol,
//! prices them per chain and quotes the bridge fee in both directions for each match.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use num_bigint::BigUint;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;
use xfee_types::{
	ChainDescriptor, ChainRegistry, ChainRegistryError, FeeQuoteRequest, FeeQuoteResult,
	FeeQuoteStatus, MatchedToken, PoolSource, PriceMap, PriceQuote, QuoteDirection, SourceError,
};

use crate::fee_engine::FeeQuoteEngine;
use crate::price_oracle::PriceOracleClient;
use crate::token_aggregator::{ChainTokens, TokenAggregator};

pub const DEFAULT_MAX_CONCURRENT_QUOTES: usize = 8;

/// Discovery run errors; per-token quote failures are never errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
	#[error("At least two chains are required, got {count}")]
	NotEnoughChains { count: usize },

	#[error(transparent)]
	Chain(#[from] ChainRegistryError),

	#[error("Pool discovery failed on {chain}: {source}")]
	PoolSource {
		chain: String,
		#[source]
		source: SourceError,
	},
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
	/// Chains to scan; the first one is paired with each of the others
	pub chains: Vec<String>,
	/// Pools at or below this liquidity are ignored
	pub min_liquidity: BigUint,
	/// Notional transfer size in USD
	pub usd_amount: Decimal,
	pub max_concurrent_quotes: usize,
	/// Keep only the highest ranked matches
	pub max_tokens: Option<usize>,
}

impl DiscoveryConfig {
	pub fn new(chains: Vec<String>, min_liquidity: BigUint, usd_amount: Decimal) -> Self {
		Self {
			chains,
			min_liquidity,
			usd_amount,
			max_concurrent_quotes: DEFAULT_MAX_CONCURRENT_QUOTES,
			max_tokens: None,
		}
	}
}

/// Fee quote for one matched token in one direction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuote {
	pub symbol: String,
	pub source_chain: String,
	pub dest_chain: String,
	pub direction: QuoteDirection,
	pub price_usd: Option<Decimal>,
	pub result: FeeQuoteResult,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverySummary {
	pub matched_tokens: usize,
	pub quotes: usize,
	pub quoted: usize,
	pub estimated: usize,
	pub no_price: usize,
	pub failed: usize,
}

impl DiscoverySummary {
	fn from_quotes(matched_tokens: usize, quotes: &[TokenQuote]) -> Self {
		let mut summary = Self {
			matched_tokens,
			quotes: quotes.len(),
			..Default::default()
		};
		for quote in quotes {
			match quote.result.status() {
				FeeQuoteStatus::Success => summary.quoted += 1,
				FeeQuoteStatus::Estimated => summary.estimated += 1,
				FeeQuoteStatus::NoPrice => summary.no_price += 1,
				_ => summary.failed += 1,
			}
		}
		summary
	}
}

/// Everything a discovery run produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryReport {
	pub run_id: String,
	pub started_at: DateTime<Utc>,
	pub finished_at: DateTime<Utc>,
	pub chains: Vec<String>,
	pub usd_amount: Decimal,
	/// Pools returned per chain
	pub pool_counts: BTreeMap<String, usize>,
	/// Distinct tokens per chain after aggregation
	pub token_counts: BTreeMap<String, usize>,
	pub matched: Vec<MatchedToken>,
	pub prices: Vec<PriceQuote>,
	pub quotes: Vec<TokenQuote>,
	pub summary: DiscoverySummary,
}

impl DiscoveryReport {
	/// Quotes for one symbol, in pair and direction order
	pub fn quotes_for(&self, symbol: &str) -> Vec<&TokenQuote> {
		self.quotes
			.iter()
			.filter(|quote| quote.symbol.eq_ignore_ascii_case(symbol))
			.collect()
	}
}

struct QuoteJob {
	order: usize,
	symbol: String,
	direction: QuoteDirection,
	price_usd: Option<Decimal>,
	request: FeeQuoteRequest,
}

/// Runs discovery over a pool source, a price oracle and a fee engine
#[derive(Debug, Clone)]
pub struct DiscoveryService {
	chains: Arc<ChainRegistry>,
	pools: Arc<dyn PoolSource>,
	prices: PriceOracleClient,
	engine: Arc<FeeQuoteEngine>,
	config: DiscoveryConfig,
}

impl DiscoveryService {
	pub fn new(
		chains: Arc<ChainRegistry>,
		pools: Arc<dyn PoolSource>,
		prices: PriceOracleClient,
		engine: Arc<FeeQuoteEngine>,
		config: DiscoveryConfig,
	) -> Self {
		Self {
			chains,
			pools,
			prices,
			engine,
			config,
		}
	}

	pub fn config(&self) -> &DiscoveryConfig {
		&self.config
	}

	pub fn engine(&self) -> &FeeQuoteEngine {
		&self.engine
	}

	fn resolve_chains(&self) -> DiscoveryResult<Vec<ChainDescriptor>> {
		if self.config.chains.len() < 2 {
			return Err(DiscoveryError::NotEnoughChains {
				count: self.config.chains.len(),
			});
		}
		self.config
			.chains
			.iter()
			.map(|name| self.chains.require(name).cloned().map_err(DiscoveryError::from))
			.collect()
	}

	/// Run one full discovery pass
	pub async fn run(&self) -> DiscoveryResult<DiscoveryReport> {
		let run_id = Uuid::new_v4().to_string();
		let started_at = Utc::now();
		let chains = self.resolve_chains()?;
		let chain_names: Vec<String> = chains.iter().map(ChainDescriptor::key).collect();

		info!(
			"Discovery {} over {} with liquidity > {}",
			run_id,
			chain_names.join(", "),
			self.config.min_liquidity
		);

		// Pools for every chain at once
		let fetches = chains.iter().map(|chain| async move {
			let pools = self
				.pools
				.fetch_pools(chain, &self.config.min_liquidity)
				.await;
			(chain, pools)
		});

		let mut pool_counts = BTreeMap::new();
		let mut token_counts = BTreeMap::new();
		let mut ranked = Vec::with_capacity(chains.len());
		for (chain, pools) in join_all(fetches).await {
			let pools = pools.map_err(|source| DiscoveryError::PoolSource {
				chain: chain.name.clone(),
				source,
			})?;
			let tokens = TokenAggregator::aggregate(&chain.name, &pools);
			pool_counts.insert(chain.key(), pools.len());
			token_counts.insert(chain.key(), tokens.len());
			ranked.push(ChainTokens::new(chain.key(), tokens));
		}

		let mut matched = TokenAggregator::intersect(&ranked);
		if !matched.is_empty() {
			warn!(
				"{} tokens matched by symbol only; contract equivalence across chains is not verified",
				matched.len()
			);
		}
		if let Some(limit) = self.config.max_tokens {
			if matched.len() > limit {
				debug!("Keeping the top {} of {} matched tokens", limit, matched.len());
				matched.truncate(limit);
			}
		}

		// Prices for every chain at once, each oracle batching sequentially
		let symbols: Vec<String> = matched.iter().map(|m| m.symbol.clone()).collect();
		let price_maps: Vec<PriceMap> = join_all(
			chains
				.iter()
				.map(|chain| self.prices.resolve_prices(&symbols, chain)),
		)
		.await;
		let price_maps: BTreeMap<String, PriceMap> =
			chain_names.iter().cloned().zip(price_maps).collect();

		let prices: Vec<PriceQuote> = matched
			.iter()
			.map(|token| {
				chain_names.iter().fold(PriceQuote::new(&token.symbol), |quote, chain| {
					let price = price_maps
						.get(chain)
						.and_then(|map| map.get(&token.symbol).copied().flatten());
					quote.with_price(chain.clone(), price)
				})
			})
			.collect();

		let jobs = self.quote_jobs(&matched, &chain_names, &prices);
		let job_count = jobs.len();
		let concurrency = self.config.max_concurrent_quotes.max(1);
		debug!("Quoting {} transfers with concurrency {}", job_count, concurrency);

		let mut ordered: Vec<(usize, TokenQuote)> = stream::iter(jobs)
			.map(|job| {
				let engine = Arc::clone(&self.engine);
				async move {
					let result = engine.quote(&job.request).await;
					let quote = TokenQuote {
						symbol: job.symbol,
						source_chain: job.request.source_chain.clone(),
						dest_chain: job.request.dest_chain.clone(),
						direction: job.direction,
						price_usd: job.price_usd,
						result,
					};
					(job.order, quote)
				}
			})
			.buffer_unordered(concurrency)
			.collect()
			.await;
		ordered.sort_by_key(|(order, _)| *order);
		let quotes: Vec<TokenQuote> = ordered.into_iter().map(|(_, quote)| quote).collect();

		let summary = DiscoverySummary::from_quotes(matched.len(), &quotes);
		info!(
			"Discovery {} finished: {} matched, {} quoted, {} estimated, {} without price, {} failed",
			run_id,
			summary.matched_tokens,
			summary.quoted,
			summary.estimated,
			summary.no_price,
			summary.failed
		);

		Ok(DiscoveryReport {
			run_id,
			started_at,
			finished_at: Utc::now(),
			chains: chain_names,
			usd_amount: self.config.usd_amount,
			pool_counts,
			token_counts,
			matched,
			prices,
			quotes,
			summary,
		})
	}

	/// Forward and reverse requests between the first chain and each other chain
	fn quote_jobs(
		&self,
		matched: &[MatchedToken],
		chain_names: &[String],
		prices: &[PriceQuote],
	) -> Vec<QuoteJob> {
		let mut jobs = Vec::new();
		let Some((home, others)) = chain_names.split_first() else {
			return jobs;
		};

		for (token, price) in matched.iter().zip(prices) {
			let Some(base) = token.to_token(chain_names) else {
				continue;
			};

			for other in others {
				for (direction, source, dest) in [
					(QuoteDirection::Forward, home, other),
					(QuoteDirection::Reverse, other, home),
				] {
					let price_usd = price.on_chain(source);
					let decimals = token
						.chain(source)
						.map(|summary| summary.decimals)
						.unwrap_or(base.decimals);
					let request = FeeQuoteRequest::new(
						base.clone(),
						source.clone(),
						dest.clone(),
						self.config.usd_amount,
						price_usd,
					)
					.with_decimals(decimals);

					jobs.push(QuoteJob {
						order: jobs.len(),
						symbol: token.symbol.clone(),
						direction,
						price_usd,
						request,
					});
				}
			}
		}
		jobs
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::price_oracle::PriceOracleConfig;
	use async_trait::async_trait;
	use rust_decimal_macros::dec;
	use std::collections::HashMap;
	use std::time::Duration;
	use xfee_types::{
		AdapterResult, FeeProvider, PoolRecord, PoolToken, PriceSource, ProviderInfo,
		ProviderKind, ProviderQuote, ProviderQuoteRequest, ProviderRuntimeConfig, SourceResult,
	};

	#[derive(Debug, Default)]
	struct FixedPools {
		pools: HashMap<String, Vec<PoolRecord>>,
		failing_chain: Option<String>,
	}

	#[async_trait]
	impl PoolSource for FixedPools {
		async fn fetch_pools(
			&self,
			chain: &ChainDescriptor,
			_min_liquidity: &BigUint,
		) -> SourceResult<Vec<PoolRecord>> {
			if self.failing_chain.as_deref() == Some(chain.name.as_str()) {
				return Err(SourceError::Remote("subgraph unavailable".to_string()));
			}
			Ok(self.pools.get(&chain.name).cloned().unwrap_or_default())
		}
	}

	#[derive(Debug)]
	struct FixedPrices(HashMap<String, Decimal>);

	#[async_trait]
	impl PriceSource for FixedPrices {
		async fn fetch_prices(
			&self,
			symbols: &[String],
			_chain: &ChainDescriptor,
		) -> SourceResult<HashMap<String, Decimal>> {
			Ok(symbols
				.iter()
				.filter_map(|s| self.0.get(s).map(|p| (s.clone(), *p)))
				.collect())
		}
	}

	/// Charges 10 bps of every transfer
	#[derive(Debug)]
	struct TenBps(ProviderInfo);

	#[async_trait]
	impl FeeProvider for TenBps {
		fn provider_info(&self) -> &ProviderInfo {
			&self.0
		}

		async fn quote_fee(
			&self,
			request: &ProviderQuoteRequest,
			_config: &ProviderRuntimeConfig,
		) -> AdapterResult<ProviderQuote> {
			Ok(ProviderQuote::TotalFee {
				fee_raw: &request.amount_raw / 1000u32,
			})
		}

		async fn health_check(&self, _config: &ProviderRuntimeConfig) -> AdapterResult<bool> {
			Ok(true)
		}
	}

	fn pool(id: &str, liquidity: u64, a: &str, b: &str) -> PoolRecord {
		let token = |s: &str| PoolToken::new(format!("0x{}", s.to_lowercase()), s, s, 18);
		PoolRecord::new(id, BigUint::from(liquidity), dec!(0), token(a), token(b))
	}

	fn service(pools: FixedPools, config: DiscoveryConfig) -> DiscoveryService {
		let chains = Arc::new(ChainRegistry::with_defaults());
		let prices = PriceOracleClient::with_config(
			Arc::new(FixedPrices(
				[("WETH".to_string(), dec!(2000)), ("USDC".to_string(), dec!(1))]
					.into_iter()
					.collect(),
			)),
			PriceOracleConfig {
				batch_size: 3,
				batch_delay: Duration::ZERO,
			},
		);
		let engine = FeeQuoteEngine::new(chains.clone()).with_provider(
			Arc::new(TenBps(ProviderInfo::new("hop", "Hop", ProviderKind::Hop, "test"))),
			ProviderRuntimeConfig::new("hop", "http://localhost", 1_000),
		);
		DiscoveryService::new(chains, Arc::new(pools), prices, Arc::new(engine), config)
	}

	fn two_chain_pools() -> FixedPools {
		FixedPools {
			pools: [
				(
					"ethereum".to_string(),
					vec![pool("e1", 1000, "WETH", "USDC"), pool("e2", 10, "PEPE", "WETH")],
				),
				(
					"polygon".to_string(),
					vec![pool("p1", 500, "USDC", "WETH"), pool("p2", 5, "DAI", "USDC")],
				),
			]
			.into_iter()
			.collect(),
			failing_chain: None,
		}
	}

	fn config() -> DiscoveryConfig {
		DiscoveryConfig::new(
			vec!["ethereum".to_string(), "polygon".to_string()],
			BigUint::from(0u32),
			dec!(1000),
		)
	}

	#[tokio::test]
	async fn test_run_quotes_both_directions_in_order() {
		let report = service(two_chain_pools(), config()).run().await.unwrap();

		let symbols: Vec<&str> = report.matched.iter().map(|m| m.symbol.as_str()).collect();
		assert_eq!(symbols, vec!["WETH", "USDC"]);
		assert_eq!(report.pool_counts["ethereum"], 2);
		assert_eq!(report.token_counts["polygon"], 3);

		assert_eq!(report.quotes.len(), 4);
		assert_eq!(report.quotes[0].symbol, "WETH");
		assert_eq!(report.quotes[0].direction, QuoteDirection::Forward);
		assert_eq!(report.quotes[0].source_chain, "ethereum");
		assert_eq!(report.quotes[1].direction, QuoteDirection::Reverse);
		assert_eq!(report.quotes[1].source_chain, "polygon");

		for quote in &report.quotes {
			assert_eq!(quote.result.status(), FeeQuoteStatus::Success);
			assert_eq!(quote.result.fee().unwrap().fee_basis_points, 10);
		}
		assert_eq!(report.summary.quoted, 4);
		assert_eq!(report.quotes_for("usdc").len(), 2);
	}

	#[tokio::test]
	async fn test_max_tokens_and_missing_price() {
		let mut pools = two_chain_pools();
		pools
			.pools
			.get_mut("ethereum")
			.unwrap()
			.push(pool("e3", 1, "DAI", "PEPE"));
		let mut config = config();
		config.max_tokens = Some(3);

		let report = service(pools, config).run().await.unwrap();

		assert_eq!(report.matched.len(), 3);
		let dai = report.quotes_for("DAI");
		assert_eq!(dai.len(), 2);
		assert!(dai
			.iter()
			.all(|q| q.result.status() == FeeQuoteStatus::NoPrice && q.price_usd.is_none()));
		assert_eq!(report.summary.no_price, 2);
	}

	#[tokio::test]
	async fn test_pool_source_failure_aborts_run() {
		let mut pools = two_chain_pools();
		pools.failing_chain = Some("polygon".to_string());

		let err = service(pools, config()).run().await.unwrap_err();
		assert!(matches!(err, DiscoveryError::PoolSource { chain, .. } if chain == "polygon"));
	}

	#[tokio::test]
	async fn test_chain_configuration_errors() {
		let mut single = config();
		single.chains.truncate(1);
		assert!(matches!(
			service(two_chain_pools(), single).run().await,
			Err(DiscoveryError::NotEnoughChains { count: 1 })
		));

		let mut unknown = config();
		unknown.chains[1] = "solana".to_string();
		assert!(matches!(
			service(two_chain_pools(), unknown).run().await,
			Err(DiscoveryError::Chain(ChainRegistryError::UnknownChain { .. }))
		));
	}
}
