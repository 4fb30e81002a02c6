//! Fee quote results

use num_bigint::BigUint;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a fee computation for one token and direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeeQuoteStatus {
	/// Authoritative fee from a bridge
	Success,
	/// Fee inferred from a swap aggregator's output amount
	Estimated,
	UnsupportedRoute,
	UnsupportedChain,
	UnsupportedToken,
	ProviderError,
	NoPrice,
	InvalidInput,
}

impl FeeQuoteStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			FeeQuoteStatus::Success => "success",
			FeeQuoteStatus::Estimated => "estimated",
			FeeQuoteStatus::UnsupportedRoute => "unsupported_route",
			FeeQuoteStatus::UnsupportedChain => "unsupported_chain",
			FeeQuoteStatus::UnsupportedToken => "unsupported_token",
			FeeQuoteStatus::ProviderError => "provider_error",
			FeeQuoteStatus::NoPrice => "no_price",
			FeeQuoteStatus::InvalidInput => "invalid_input",
		}
	}

	/// Whether a fee is attached
	pub fn has_fee(&self) -> bool {
		matches!(self, FeeQuoteStatus::Success | FeeQuoteStatus::Estimated)
	}

	/// Specificity of a provider failure; higher wins when all providers are exhausted
	fn exhaustion_rank(&self) -> u8 {
		match self {
			FeeQuoteStatus::UnsupportedRoute => 4,
			FeeQuoteStatus::ProviderError => 3,
			FeeQuoteStatus::UnsupportedChain => 2,
			FeeQuoteStatus::UnsupportedToken => 1,
			_ => 0,
		}
	}

	/// Final status after every provider failed
	///
	/// Picks the most specific failure, `UnsupportedRoute` when there were no attempts.
	pub fn exhausted<'a>(attempts: impl IntoIterator<Item = &'a ProviderAttempt>) -> Self {
		attempts
			.into_iter()
			.map(|attempt| attempt.status)
			.filter(|status| status.exhaustion_rank() > 0)
			.max_by_key(|status| status.exhaustion_rank())
			.unwrap_or(FeeQuoteStatus::UnsupportedRoute)
	}
}

impl fmt::Display for FeeQuoteStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Normalized fee from a provider quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuotedFee {
	pub provider_name: String,
	/// Fee relative to the principal, in basis points
	pub fee_basis_points: u64,
	pub fee_usd: Decimal,
	/// Fee in minimal token units
	#[serde(with = "crate::serde_utils::biguint_string")]
	pub fee_raw: BigUint,
	/// Principal in minimal token units
	#[serde(with = "crate::serde_utils::biguint_string")]
	pub amount_raw: BigUint,
}

/// What happened when a provider was considered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
	/// Provider returned a usable quote
	Quoted,
	/// Provider was not called
	Skipped,
	/// Provider was called and failed
	Failed,
}

/// Diagnostic record of one provider attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAttempt {
	pub provider_id: String,
	pub outcome: AttemptOutcome,
	pub status: FeeQuoteStatus,
	pub message: Option<String>,
	pub elapsed_ms: u64,
}

impl ProviderAttempt {
	pub fn quoted(provider_id: impl Into<String>, status: FeeQuoteStatus, elapsed_ms: u64) -> Self {
		Self {
			provider_id: provider_id.into(),
			outcome: AttemptOutcome::Quoted,
			status,
			message: None,
			elapsed_ms,
		}
	}

	pub fn skipped(
		provider_id: impl Into<String>,
		status: FeeQuoteStatus,
		message: impl Into<String>,
	) -> Self {
		Self {
			provider_id: provider_id.into(),
			outcome: AttemptOutcome::Skipped,
			status,
			message: Some(message.into()),
			elapsed_ms: 0,
		}
	}

	pub fn failed(
		provider_id: impl Into<String>,
		status: FeeQuoteStatus,
		message: impl Into<String>,
		elapsed_ms: u64,
	) -> Self {
		Self {
			provider_id: provider_id.into(),
			outcome: AttemptOutcome::Failed,
			status,
			message: Some(message.into()),
			elapsed_ms,
		}
	}

	/// Whether the provider was actually called
	pub fn was_called(&self) -> bool {
		self.outcome != AttemptOutcome::Skipped
	}
}

/// Result of computing the fee for one token and direction
///
/// A fee is present exactly when the status is `Success` or `Estimated`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuoteResult {
	status: FeeQuoteStatus,
	fee: Option<QuotedFee>,
	reason: Option<String>,
	attempts: Vec<ProviderAttempt>,
}

impl FeeQuoteResult {
	/// Authoritative fee
	pub fn success(fee: QuotedFee, attempts: Vec<ProviderAttempt>) -> Self {
		Self {
			status: FeeQuoteStatus::Success,
			fee: Some(fee),
			reason: None,
			attempts,
		}
	}

	/// Fee inferred from an output amount
	pub fn estimated(fee: QuotedFee, attempts: Vec<ProviderAttempt>) -> Self {
		Self {
			status: FeeQuoteStatus::Estimated,
			fee: Some(fee),
			reason: None,
			attempts,
		}
	}

	/// Failure with the given status; a fee-bearing status is treated as a provider error
	pub fn failure(
		status: FeeQuoteStatus,
		reason: impl Into<String>,
		attempts: Vec<ProviderAttempt>,
	) -> Self {
		let status = if status.has_fee() {
			FeeQuoteStatus::ProviderError
		} else {
			status
		};
		Self {
			status,
			fee: None,
			reason: Some(reason.into()),
			attempts,
		}
	}

	pub fn no_price(symbol: &str) -> Self {
		Self::failure(
			FeeQuoteStatus::NoPrice,
			format!("No USD price available for {}", symbol),
			Vec::new(),
		)
	}

	pub fn invalid_input(reason: impl Into<String>) -> Self {
		Self::failure(FeeQuoteStatus::InvalidInput, reason, Vec::new())
	}

	pub fn status(&self) -> FeeQuoteStatus {
		self.status
	}

	pub fn fee(&self) -> Option<&QuotedFee> {
		self.fee.as_ref()
	}

	pub fn reason(&self) -> Option<&str> {
		self.reason.as_deref()
	}

	pub fn attempts(&self) -> &[ProviderAttempt] {
		&self.attempts
	}

	pub fn is_quoted(&self) -> bool {
		self.fee.is_some()
	}

	/// Number of providers that were actually called
	pub fn provider_calls(&self) -> usize {
		self.attempts.iter().filter(|a| a.was_called()).count()
	}
}
