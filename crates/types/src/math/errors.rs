//! Error types for fixed-point math

use thiserror::Error;

/// Errors raised by price and amount conversions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
	#[error("Invalid numeric input: {reason}")]
	InvalidInput { reason: String },
}

impl MathError {
	pub fn invalid_input(reason: impl Into<String>) -> Self {
		Self::InvalidInput {
			reason: reason.into(),
		}
	}
}

pub type MathResult<T> = Result<T, MathError>;
