//! Call-tracking fee providers

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use xfee_scanner::num_bigint::BigUint;
use xfee_scanner::models::{
	AdapterError, AdapterResult, FeeProvider, ProviderInfo, ProviderKind, ProviderQuote,
	ProviderQuoteRequest, ProviderRuntimeConfig,
};

/// What the mock answers with
#[derive(Debug, Clone)]
pub enum MockResponse {
	TotalFee(u64),
	OutputAmount(u64),
	/// Error classified as an unsupported route
	NoRoute,
	/// Error classified as a transport failure
	Down,
}

/// Provider that counts its calls and can be slowed down
#[derive(Debug, Clone)]
pub struct MockProvider {
	info: ProviderInfo,
	call_tracker: Arc<AtomicUsize>,
	last_amount: Arc<std::sync::Mutex<Option<BigUint>>>,
	pub response: MockResponse,
	pub response_delay_ms: u64,
}

impl MockProvider {
	pub fn with_config(id: &str, kind: ProviderKind, response: MockResponse, response_delay_ms: u64) -> Self {
		Self {
			info: ProviderInfo::new(id, format!("{} Provider", id), kind, "1.0.0"),
			call_tracker: Arc::new(AtomicUsize::new(0)),
			last_amount: Arc::new(std::sync::Mutex::new(None)),
			response,
			response_delay_ms,
		}
	}

	/// Bridge returning a total fee
	pub fn bridge(id: &str, fee_raw: u64) -> Self {
		Self::with_config(id, ProviderKind::Hop, MockResponse::TotalFee(fee_raw), 0)
	}

	/// Aggregator returning an output amount
	pub fn aggregator(id: &str, amount_out_raw: u64) -> Self {
		Self::with_config(
			id,
			ProviderKind::SwapAggregator,
			MockResponse::OutputAmount(amount_out_raw),
			0,
		)
	}

	pub fn failing(id: &str, kind: ProviderKind, response: MockResponse) -> Self {
		Self::with_config(id, kind, response, 0)
	}

	pub fn slow(id: &str, kind: ProviderKind, response: MockResponse, delay_ms: u64) -> Self {
		Self::with_config(id, kind, response, delay_ms)
	}

	pub fn call_count(&self) -> usize {
		self.call_tracker.load(Ordering::Relaxed)
	}

	/// Principal of the most recent call
	pub fn last_amount(&self) -> Option<BigUint> {
		self.last_amount.lock().unwrap().clone()
	}

	pub fn runtime_config(&self) -> ProviderRuntimeConfig {
		ProviderRuntimeConfig::new(self.info.provider_id.clone(), "http://mock.invalid", 5_000)
	}
}

#[async_trait]
impl FeeProvider for MockProvider {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn quote_fee(
		&self,
		request: &ProviderQuoteRequest,
		_config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderQuote> {
		self.call_tracker.fetch_add(1, Ordering::Relaxed);
		*self.last_amount.lock().unwrap() = Some(request.amount_raw.clone());

		if self.response_delay_ms > 0 {
			tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;
		}

		match &self.response {
			MockResponse::TotalFee(fee) => Ok(ProviderQuote::TotalFee {
				fee_raw: BigUint::from(*fee),
			}),
			MockResponse::OutputAmount(out) => Ok(ProviderQuote::OutputAmount {
				amount_out_raw: BigUint::from(*out),
			}),
			MockResponse::NoRoute => Err(AdapterError::UnsupportedRoute {
				reason: format!("{} has no route", self.info.provider_id),
			}),
			MockResponse::Down => Err(AdapterError::Network("connection refused".to_string())),
		}
	}

	async fn health_check(&self, _config: &ProviderRuntimeConfig) -> AdapterResult<bool> {
		Ok(!matches!(self.response, MockResponse::Down))
	}
}
