//! USD price models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolved USD prices for one chain, keyed by requested symbol
///
/// A symbol without a price maps to `None`, never to zero.
pub type PriceMap = BTreeMap<String, Option<Decimal>>;

/// USD price of one token symbol on each chain it was priced on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
	pub symbol: String,
	pub per_chain: BTreeMap<String, Option<Decimal>>,
}

impl PriceQuote {
	pub fn new(symbol: impl Into<String>) -> Self {
		Self {
			symbol: symbol.into(),
			per_chain: BTreeMap::new(),
		}
	}

	pub fn with_price(mut self, chain: impl Into<String>, price: Option<Decimal>) -> Self {
		self.per_chain.insert(chain.into().to_lowercase(), price);
		self
	}

	/// Price on the given chain; `None` when absent or unresolved
	pub fn on_chain(&self, chain: &str) -> Option<Decimal> {
		self.per_chain.get(&chain.to_lowercase()).copied().flatten()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	#[test]
	fn test_price_quote_lookup() {
		let quote = PriceQuote::new("USDC")
			.with_price("Ethereum", Some(dec!(1.0001)))
			.with_price("polygon", None);

		assert_eq!(quote.on_chain("ethereum"), Some(dec!(1.0001)));
		assert_eq!(quote.on_chain("polygon"), None);
		assert_eq!(quote.on_chain("base"), None);
		assert_eq!(quote.per_chain.len(), 2);
	}
}
