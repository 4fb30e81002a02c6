//! Per-chain token aggregation and cross-chain symbol matching

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};
use xfee_types::{AggregatedToken, MatchedToken, PoolRecord};

/// Ranked token aggregates for one chain
#[derive(Debug, Clone)]
pub struct ChainTokens {
	pub chain: String,
	pub tokens: Vec<AggregatedToken>,
}

impl ChainTokens {
	pub fn new(chain: impl Into<String>, tokens: Vec<AggregatedToken>) -> Self {
		Self {
			chain: chain.into().to_lowercase(),
			tokens,
		}
	}
}

/// Reduces pool lists into ranked tokens and intersects them across chains
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenAggregator;

impl TokenAggregator {
	/// Sum liquidity and volume per symbol, then rank by total liquidity
	///
	/// Both legs of a pool are counted, even when they share a symbol. Ties in
	/// liquidity keep the order in which the symbols were first seen.
	pub fn aggregate(chain: &str, pools: &[PoolRecord]) -> Vec<AggregatedToken> {
		let mut index: HashMap<&str, usize> = HashMap::new();
		let mut tokens: Vec<AggregatedToken> = Vec::new();

		for pool in pools {
			for token in pool.tokens() {
				match index.get(token.symbol.as_str()) {
					Some(&position) => {
						let entry = &mut tokens[position];
						entry.total_liquidity += &pool.liquidity;
						match entry.total_volume_usd.checked_add(pool.volume_usd) {
							Some(total) => entry.total_volume_usd = total,
							None => warn!(
								"Volume overflow for {} on {} at pool {}, keeping previous total",
								token.symbol, chain, pool.id
							),
						}
						entry.pool_count += 1;
						if pool.liquidity > entry.representative_pool.liquidity {
							entry.representative_pool = pool.clone();
						}
					}
					None => {
						index.insert(token.symbol.as_str(), tokens.len());
						tokens.push(AggregatedToken {
							token: token.clone(),
							total_liquidity: pool.liquidity.clone(),
							total_volume_usd: pool.volume_usd,
							representative_pool: pool.clone(),
							pool_count: 1,
						});
					}
				}
			}
		}

		// stable: equal liquidity keeps encounter order
		tokens.sort_by(|a, b| b.total_liquidity.cmp(&a.total_liquidity));

		debug!(
			"Aggregated {} pools into {} tokens on {}",
			pools.len(),
			tokens.len(),
			chain
		);
		tokens
	}

	/// Symbols present on every chain, matched case-insensitively
	///
	/// Each chain contributes its highest-ranked token for the symbol. Output follows
	/// the first chain's ranking and uses its symbol casing. Fewer than two chains
	/// yields nothing.
	pub fn intersect(chains: &[ChainTokens]) -> Vec<MatchedToken> {
		if chains.len() < 2 {
			warn!(
				"Token intersection needs at least two chains, got {}",
				chains.len()
			);
			return Vec::new();
		}

		let lookups: Vec<HashMap<String, &AggregatedToken>> = chains
			.iter()
			.map(|chain| {
				let mut lookup = HashMap::new();
				for token in &chain.tokens {
					lookup
						.entry(token.symbol().to_lowercase())
						.or_insert(token);
				}
				lookup
			})
			.collect();

		let mut emitted = HashSet::new();
		let mut matched = Vec::new();

		for token in &chains[0].tokens {
			let key = token.symbol().to_lowercase();
			if emitted.contains(&key) || !lookups.iter().all(|lookup| lookup.contains_key(&key)) {
				continue;
			}

			let mut entry = MatchedToken::new(token.symbol());
			for (chain, lookup) in chains.iter().zip(&lookups) {
				if let Some(found) = lookup.get(&key) {
					entry.per_chain.insert(chain.chain.clone(), found.summary());
				}
			}
			emitted.insert(key);
			matched.push(entry);
		}

		debug!(
			"Matched {} symbols across {} chains",
			matched.len(),
			chains.len()
		);
		matched
	}
}
