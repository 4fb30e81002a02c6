//! Liquidity pool records and per-chain token aggregates

use num_bigint::BigUint;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::token::{PoolToken, Token};

/// A two-token liquidity pool as reported by the pool source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
	pub id: String,
	#[serde(with = "crate::serde_utils::biguint_string")]
	pub liquidity: BigUint,
	pub volume_usd: Decimal,
	pub token0: PoolToken,
	pub token1: PoolToken,
}

impl PoolRecord {
	pub fn new(
		id: impl Into<String>,
		liquidity: BigUint,
		volume_usd: Decimal,
		token0: PoolToken,
		token1: PoolToken,
	) -> Self {
		Self {
			id: id.into(),
			liquidity,
			volume_usd,
			token0,
			token1,
		}
	}

	/// Both tokens of the pool, in pool order
	pub fn tokens(&self) -> [&PoolToken; 2] {
		[&self.token0, &self.token1]
	}
}

/// Liquidity and volume of one token summed over every pool that contains it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedToken {
	/// Token metadata from the first pool it was seen in
	pub token: PoolToken,
	#[serde(with = "crate::serde_utils::biguint_string")]
	pub total_liquidity: BigUint,
	pub total_volume_usd: Decimal,
	/// Deepest pool containing the token
	pub representative_pool: PoolRecord,
	pub pool_count: usize,
}

impl AggregatedToken {
	pub fn symbol(&self) -> &str {
		&self.token.symbol
	}

	/// Per-chain view of this aggregate
	pub fn summary(&self) -> ChainTokenSummary {
		ChainTokenSummary {
			address: self.token.address.clone(),
			name: self.token.name.clone(),
			decimals: self.token.decimals,
			total_liquidity: self.total_liquidity.clone(),
			total_volume_usd: self.total_volume_usd,
			representative_pool_id: self.representative_pool.id.clone(),
			representative_pool_liquidity: self.representative_pool.liquidity.clone(),
			pool_count: self.pool_count,
		}
	}
}

/// What a matched token looks like on one chain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChainTokenSummary {
	pub address: String,
	pub name: String,
	pub decimals: u8,
	#[serde(with = "crate::serde_utils::biguint_string")]
	pub total_liquidity: BigUint,
	pub total_volume_usd: Decimal,
	pub representative_pool_id: String,
	#[serde(with = "crate::serde_utils::biguint_string")]
	pub representative_pool_liquidity: BigUint,
	pub pool_count: usize,
}

/// A symbol found on two or more chains
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchedToken {
	/// Display symbol, cased as on the first chain
	pub symbol: String,
	/// Per-chain details keyed by chain name
	pub per_chain: BTreeMap<String, ChainTokenSummary>,
}

impl MatchedToken {
	pub fn new(symbol: impl Into<String>) -> Self {
		Self {
			symbol: symbol.into(),
			per_chain: BTreeMap::new(),
		}
	}

	pub fn chain(&self, chain: &str) -> Option<&ChainTokenSummary> {
		self.per_chain.get(&chain.to_lowercase())
	}

	/// Build the cross-chain token view used for fee quoting
	///
	/// Decimals come from the first chain that reports the token, in the given order.
	pub fn to_token(&self, chain_order: &[String]) -> Option<Token> {
		let primary = chain_order
			.iter()
			.find_map(|chain| self.chain(chain))
			.or_else(|| self.per_chain.values().next())?;

		let mut token = Token::new(self.symbol.clone(), primary.name.clone(), primary.decimals);
		for (chain, summary) in &self.per_chain {
			token = token.with_address(chain.clone(), summary.address.clone());
		}
		Some(token)
	}
}
