//! Error types for fee provider operations

use thiserror::Error;

use crate::quotes::FeeQuoteStatus;

/// Fee provider errors
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("HTTP request failed: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("Timeout occurred after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("HTTP {status_code}: {reason}")]
	HttpStatusError { status_code: u16, reason: String },

	#[error("Provider returned error: {code} - {message}")]
	ProviderError { code: String, message: String },

	#[error("Configuration error: {reason}")]
	ConfigError { reason: String },

	#[error("Token {symbol} not supported by provider {provider_id}")]
	UnsupportedToken { symbol: String, provider_id: String },

	#[error("Chain {chain} not supported by provider {provider_id}")]
	UnsupportedChain { chain: String, provider_id: String },

	#[error("Route not available: {reason}")]
	UnsupportedRoute { reason: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Network error: {0}")]
	Network(String),

	#[error("Unsupported provider: {0}")]
	UnsupportedProvider(String),
}

/// How the engine should account for a provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFailureKind {
	UnsupportedToken,
	UnsupportedChain,
	UnsupportedRoute,
	/// Transport, timeout, protocol or payload failure
	Transport,
}

impl ProviderFailureKind {
	pub fn status(&self) -> FeeQuoteStatus {
		match self {
			ProviderFailureKind::UnsupportedToken => FeeQuoteStatus::UnsupportedToken,
			ProviderFailureKind::UnsupportedChain => FeeQuoteStatus::UnsupportedChain,
			ProviderFailureKind::UnsupportedRoute => FeeQuoteStatus::UnsupportedRoute,
			ProviderFailureKind::Transport => FeeQuoteStatus::ProviderError,
		}
	}
}

impl AdapterError {
	/// Extract HTTP status code from the error if available
	pub fn status_code(&self) -> Option<u16> {
		match self {
			AdapterError::HttpStatusError { status_code, .. } => Some(*status_code),
			AdapterError::HttpError(reqwest_error) => {
				reqwest_error.status().map(|status| status.as_u16())
			}
			_ => None,
		}
	}

	/// Classify the failure for fallback accounting
	pub fn failure_kind(&self) -> ProviderFailureKind {
		match self {
			AdapterError::UnsupportedToken { .. } => ProviderFailureKind::UnsupportedToken,
			AdapterError::UnsupportedChain { .. } => ProviderFailureKind::UnsupportedChain,
			AdapterError::UnsupportedRoute { .. } => ProviderFailureKind::UnsupportedRoute,
			_ => ProviderFailureKind::Transport,
		}
	}

	/// Create an HTTP failure error with the given status code and reason
	pub fn http_failure(status_code: u16, reason: impl Into<String>) -> Self {
		Self::HttpStatusError {
			status_code,
			reason: reason.into(),
		}
	}

	/// Create an HTTP failure error from response status with default reason
	pub fn from_http_failure(status_code: u16) -> Self {
		let reason = match status_code {
			400 => "Bad Request".to_string(),
			401 => "Unauthorized".to_string(),
			403 => "Forbidden".to_string(),
			404 => "Not Found".to_string(),
			408 => "Request Timeout".to_string(),
			429 => "Too Many Requests".to_string(),
			500 => "Internal Server Error".to_string(),
			502 => "Bad Gateway".to_string(),
			503 => "Service Unavailable".to_string(),
			504 => "Gateway Timeout".to_string(),
			_ => format!("HTTP Error {}", status_code),
		};

		Self::HttpStatusError {
			status_code,
			reason,
		}
	}

	pub fn invalid_response(reason: impl Into<String>) -> Self {
		Self::InvalidResponse {
			reason: reason.into(),
		}
	}
}

/// Provider registration errors
#[derive(Error, Debug)]
pub enum AdapterFactoryError {
	#[error("Provider already registered: {provider_id}")]
	AlreadyRegistered { provider_id: String },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_adapter_error_status_code_extraction() {
		let error = AdapterError::HttpStatusError {
			status_code: 404,
			reason: "Not Found".to_string(),
		};
		assert_eq!(error.status_code(), Some(404));

		let error = AdapterError::http_failure(500, "Internal Server Error");
		assert_eq!(error.status_code(), Some(500));

		let error = AdapterError::from_http_failure(429);
		assert_eq!(error.status_code(), Some(429));
		assert!(error.to_string().contains("Too Many Requests"));

		let error = AdapterError::invalid_response("Bad response");
		assert_eq!(error.status_code(), None);
	}

	#[test]
	fn test_failure_kind_classification() {
		let error = AdapterError::UnsupportedToken {
			symbol: "PEPE".to_string(),
			provider_id: "hop".to_string(),
		};
		assert_eq!(error.failure_kind(), ProviderFailureKind::UnsupportedToken);
		assert_eq!(
			error.failure_kind().status(),
			FeeQuoteStatus::UnsupportedToken
		);

		let error = AdapterError::UnsupportedRoute {
			reason: "token missing from list".to_string(),
		};
		assert_eq!(
			error.failure_kind().status(),
			FeeQuoteStatus::UnsupportedRoute
		);

		let error = AdapterError::Timeout { timeout_ms: 30_000 };
		assert_eq!(error.failure_kind(), ProviderFailureKind::Transport);
		assert_eq!(error.failure_kind().status(), FeeQuoteStatus::ProviderError);

		let error = AdapterError::from_http_failure(502);
		assert_eq!(error.failure_kind(), ProviderFailureKind::Transport);
	}
}
