//! Rate-limit aware USD price resolution

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use xfee_types::{ChainDescriptor, PriceMap, PriceSource};

/// Symbols per upstream request
pub const DEFAULT_PRICE_BATCH_SIZE: usize = 3;
/// Pause between consecutive batches
pub const DEFAULT_PRICE_BATCH_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct PriceOracleConfig {
	pub batch_size: usize,
	pub batch_delay: Duration,
}

impl Default for PriceOracleConfig {
	fn default() -> Self {
		Self {
			batch_size: DEFAULT_PRICE_BATCH_SIZE,
			batch_delay: DEFAULT_PRICE_BATCH_DELAY,
		}
	}
}

/// Resolves USD prices in small sequential batches
///
/// A failed batch leaves its symbols without a price and does not stop later batches.
#[derive(Debug, Clone)]
pub struct PriceOracleClient {
	source: Arc<dyn PriceSource>,
	config: PriceOracleConfig,
}

impl PriceOracleClient {
	pub fn new(source: Arc<dyn PriceSource>) -> Self {
		Self::with_config(source, PriceOracleConfig::default())
	}

	pub fn with_config(source: Arc<dyn PriceSource>, config: PriceOracleConfig) -> Self {
		Self { source, config }
	}

	pub fn config(&self) -> &PriceOracleConfig {
		&self.config
	}

	/// Price every symbol on the chain; unresolved symbols map to `None`
	pub async fn resolve_prices(&self, symbols: &[String], chain: &ChainDescriptor) -> PriceMap {
		let mut prices = PriceMap::new();
		let mut pending: Vec<String> = Vec::new();
		for symbol in symbols {
			if !prices.contains_key(symbol) {
				prices.insert(symbol.clone(), None);
				pending.push(symbol.clone());
			}
		}

		let batch_size = self.config.batch_size.max(1);
		let batches: Vec<&[String]> = pending.chunks(batch_size).collect();
		let batch_count = batches.len();

		for (index, batch) in batches.into_iter().enumerate() {
			if index > 0 && !self.config.batch_delay.is_zero() {
				tokio::time::sleep(self.config.batch_delay).await;
			}

			debug!(
				"Price batch {}/{} on {}: {}",
				index + 1,
				batch_count,
				chain.name,
				batch.join(",")
			);

			match self.source.fetch_prices(batch, chain).await {
				Ok(found) => {
					let found: HashMap<String, Decimal> = found
						.into_iter()
						.map(|(symbol, price)| (symbol.to_uppercase(), price))
						.collect();
					for symbol in batch {
						if let Some(price) = found.get(&symbol.to_uppercase()) {
							prices.insert(symbol.clone(), Some(*price));
						}
					}
				}
				Err(e) => {
					warn!(
						"Price batch {}/{} on {} failed, leaving {} symbols unpriced: {}",
						index + 1,
						batch_count,
						chain.name,
						batch.len(),
						e
					);
				}
			}
		}

		let priced = prices.values().filter(|price| price.is_some()).count();
		info!(
			"Resolved {}/{} prices on {}",
			priced,
			prices.len(),
			chain.name
		);
		prices
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use rust_decimal_macros::dec;
	use std::sync::Mutex;
	use xfee_types::{SourceError, SourceResult};

	/// Records every batch and fails the batches listed in `failing`
	///
	/// Answers with upper-cased keys, as the price API does.
	#[derive(Debug, Default)]
	struct RecordingPrices {
		prices: HashMap<String, Decimal>,
		failing: Vec<usize>,
		batches: Mutex<Vec<Vec<String>>>,
	}

	#[async_trait]
	impl PriceSource for RecordingPrices {
		async fn fetch_prices(
			&self,
			symbols: &[String],
			_chain: &ChainDescriptor,
		) -> SourceResult<HashMap<String, Decimal>> {
			let index = {
				let mut batches = self.batches.lock().unwrap();
				batches.push(symbols.to_vec());
				batches.len() - 1
			};
			if self.failing.contains(&index) {
				return Err(SourceError::Remote("rate limited".to_string()));
			}
			Ok(symbols
				.iter()
				.filter_map(|s| {
					let key = s.to_uppercase();
					self.prices.get(&key).map(|p| (key, *p))
				})
				.collect())
		}
	}

	fn symbols(list: &[&str]) -> Vec<String> {
		list.iter().map(|s| s.to_string()).collect()
	}

	fn fast() -> PriceOracleConfig {
		PriceOracleConfig {
			batch_size: 3,
			batch_delay: Duration::from_millis(1),
		}
	}

	#[tokio::test]
	async fn test_batches_of_three_and_failed_batch_stays_unpriced() {
		let source = Arc::new(RecordingPrices {
			prices: [
				("A", dec!(1)),
				("B", dec!(2)),
				("C", dec!(3)),
				("D", dec!(4)),
				("E", dec!(5)),
				("F", dec!(6)),
				("G", dec!(7)),
			]
			.into_iter()
			.map(|(s, p)| (s.to_string(), p))
			.collect(),
			failing: vec![1],
			batches: Mutex::new(Vec::new()),
		});
		let oracle = PriceOracleClient::with_config(source.clone(), fast());

		let prices = oracle
			.resolve_prices(
				&symbols(&["A", "B", "C", "D", "E", "F", "G"]),
				&ChainDescriptor::ethereum(),
			)
			.await;

		let batches = source.batches.lock().unwrap().clone();
		assert_eq!(
			batches,
			vec![
				symbols(&["A", "B", "C"]),
				symbols(&["D", "E", "F"]),
				symbols(&["G"])
			]
		);
		assert_eq!(prices.len(), 7);
		assert_eq!(prices["A"], Some(dec!(1)));
		assert_eq!(prices["D"], None);
		assert_eq!(prices["F"], None);
		assert_eq!(prices["G"], Some(dec!(7)));
	}

	#[tokio::test]
	async fn test_missing_symbols_map_to_none() {
		let source = Arc::new(RecordingPrices {
			prices: [("USDC".to_string(), dec!(1))].into_iter().collect(),
			..Default::default()
		});
		let oracle = PriceOracleClient::with_config(source, fast());

		let prices = oracle
			.resolve_prices(&symbols(&["USDC", "OBSCURE"]), &ChainDescriptor::polygon())
			.await;

		assert_eq!(prices["USDC"], Some(dec!(1)));
		assert_eq!(prices["OBSCURE"], None);
	}

	#[tokio::test]
	async fn test_response_keys_match_case_insensitively() {
		let source = Arc::new(RecordingPrices {
			prices: [("USDC.E".to_string(), dec!(0.999))].into_iter().collect(),
			..Default::default()
		});
		let oracle = PriceOracleClient::with_config(source, fast());

		let prices = oracle
			.resolve_prices(&symbols(&["USDC.e"]), &ChainDescriptor::base())
			.await;

		assert_eq!(prices["USDC.e"], Some(dec!(0.999)));
	}

	#[tokio::test]
	async fn test_duplicates_and_empty_input() {
		let source = Arc::new(RecordingPrices::default());
		let oracle = PriceOracleClient::with_config(source.clone(), fast());

		assert!(oracle
			.resolve_prices(&[], &ChainDescriptor::base())
			.await
			.is_empty());
		assert!(source.batches.lock().unwrap().is_empty());

		let prices = oracle
			.resolve_prices(&symbols(&["DAI", "DAI"]), &ChainDescriptor::base())
			.await;
		assert_eq!(prices.len(), 1);
		assert_eq!(source.batches.lock().unwrap().len(), 1);
	}
}
