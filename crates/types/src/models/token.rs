//! Token models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Chain-scoped token metadata as reported by a liquidity pool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PoolToken {
	/// Contract address on the pool's chain
	pub address: String,
	pub symbol: String,
	pub name: String,
	pub decimals: u8,
}

impl PoolToken {
	pub fn new(
		address: impl Into<String>,
		symbol: impl Into<String>,
		name: impl Into<String>,
		decimals: u8,
	) -> Self {
		Self {
			address: address.into(),
			symbol: symbol.into(),
			name: name.into(),
			decimals,
		}
	}
}

/// A token considered the same asset across chains
///
/// Identity is by symbol only; contract equivalence across chains is not verified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
	pub symbol: String,
	pub display_name: String,
	pub decimals: u8,
	/// Contract address per chain name
	pub addresses: BTreeMap<String, String>,
}

impl Token {
	pub fn new(symbol: impl Into<String>, display_name: impl Into<String>, decimals: u8) -> Self {
		Self {
			symbol: symbol.into(),
			display_name: display_name.into(),
			decimals,
			addresses: BTreeMap::new(),
		}
	}

	pub fn with_address(mut self, chain: impl Into<String>, address: impl Into<String>) -> Self {
		self.addresses.insert(chain.into().to_lowercase(), address.into());
		self
	}

	/// Contract address on the given chain
	pub fn address_on(&self, chain: &str) -> Option<&str> {
		self.addresses.get(&chain.to_lowercase()).map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_token_address_lookup_is_case_insensitive() {
		let token = Token::new("USDC", "USD Coin", 6)
			.with_address("Ethereum", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")
			.with_address("polygon", "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359");

		assert_eq!(
			token.address_on("ETHEREUM"),
			Some("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")
		);
		assert!(token.address_on("base").is_none());
	}
}
