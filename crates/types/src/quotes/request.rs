//! Fee quote request model and validation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{QuoteValidationError, QuoteValidationResult};
use crate::models::Token;

/// Which way a matched token is being moved between the chain pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuoteDirection {
	/// First chain to second chain
	Forward,
	/// Second chain to first chain
	Reverse,
}

impl fmt::Display for QuoteDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			QuoteDirection::Forward => f.write_str("forward"),
			QuoteDirection::Reverse => f.write_str("reverse"),
		}
	}
}

/// Request for the fee of moving `usd_amount` worth of a token between two chains
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuoteRequest {
	pub token: Token,
	pub source_chain: String,
	pub dest_chain: String,
	/// Notional transfer size in USD
	pub usd_amount: Decimal,
	/// USD price of the token on the source chain, if known
	pub token_price_usd: Option<Decimal>,
	/// Decimals used to convert into minimal units
	pub decimals: u8,
}

impl FeeQuoteRequest {
	pub fn new(
		token: Token,
		source_chain: impl Into<String>,
		dest_chain: impl Into<String>,
		usd_amount: Decimal,
		token_price_usd: Option<Decimal>,
	) -> Self {
		let decimals = token.decimals;
		Self {
			token,
			source_chain: source_chain.into(),
			dest_chain: dest_chain.into(),
			usd_amount,
			token_price_usd,
			decimals,
		}
	}

	pub fn with_decimals(mut self, decimals: u8) -> Self {
		self.decimals = decimals;
		self
	}

	/// Usable price, or `None` when absent, zero or negative
	pub fn usable_price(&self) -> Option<Decimal> {
		self.token_price_usd
			.filter(|price| price.is_sign_positive() && !price.is_zero())
	}

	/// Token contract on the source chain
	pub fn source_address(&self) -> Option<&str> {
		self.token.address_on(&self.source_chain)
	}

	/// Token contract on the destination chain
	pub fn dest_address(&self) -> Option<&str> {
		self.token.address_on(&self.dest_chain)
	}

	/// Validate the shape of the request
	///
	/// Chain existence and price availability are checked by the engine, which reports
	/// them as their own statuses.
	pub fn validate(&self) -> QuoteValidationResult<()> {
		if self.token.symbol.trim().is_empty() {
			return Err(QuoteValidationError::MissingRequiredField {
				field: "token.symbol".to_string(),
			});
		}

		if self.source_chain.trim().is_empty() {
			return Err(QuoteValidationError::MissingRequiredField {
				field: "source_chain".to_string(),
			});
		}

		if self.dest_chain.trim().is_empty() {
			return Err(QuoteValidationError::MissingRequiredField {
				field: "dest_chain".to_string(),
			});
		}

		if self.source_chain.eq_ignore_ascii_case(&self.dest_chain) {
			return Err(QuoteValidationError::SameChain {
				chain: self.source_chain.clone(),
			});
		}

		if self.usd_amount <= Decimal::ZERO {
			return Err(QuoteValidationError::InvalidAmount {
				field: "usd_amount".to_string(),
				reason: "must be positive".to_string(),
			});
		}

		Ok(())
	}
}
