//! Error types for fee quote requests

use thiserror::Error;

/// Validation errors for fee quote requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteValidationError {
	#[error("Invalid amount: {field} - {reason}")]
	InvalidAmount { field: String, reason: String },

	#[error("Source and destination chain are the same: {chain}")]
	SameChain { chain: String },

	#[error("Missing required field: {field}")]
	MissingRequiredField { field: String },

	#[error("Token {symbol} has no address on {chain}")]
	MissingTokenAddress { symbol: String, chain: String },
}
