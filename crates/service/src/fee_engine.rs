//! Fee quote engine
//!
//! Tries providers in priority order and normalizes the first usable quote into a fee
//! in basis points and USD. Every provider that is considered leaves a diagnostic
//! attempt on the result.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use num_bigint::BigUint;
use num_traits::Zero;
use rust_decimal::Decimal;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use xfee_types::math::{basis_points, fee_usd, human_amount_from_usd, to_minimal_units};
use xfee_types::{
	ChainDescriptor, ChainRegistry, FeeProvider, FeeQuoteRequest, FeeQuoteResult, FeeQuoteStatus,
	ProviderAttempt, ProviderQuote, ProviderQuoteRequest, ProviderRuntimeConfig, QuotedFee,
};

/// Upper bound for a single provider call
pub const DEFAULT_PROVIDER_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// A provider and the runtime config it is called with
#[derive(Debug, Clone)]
pub struct ProviderEntry {
	pub provider: Arc<dyn FeeProvider>,
	pub config: ProviderRuntimeConfig,
}

/// Ordered provider fallback over a chain registry
#[derive(Debug, Clone)]
pub struct FeeQuoteEngine {
	providers: Vec<ProviderEntry>,
	chains: Arc<ChainRegistry>,
	call_timeout: Duration,
}

impl FeeQuoteEngine {
	pub fn new(chains: Arc<ChainRegistry>) -> Self {
		Self {
			providers: Vec::new(),
			chains,
			call_timeout: DEFAULT_PROVIDER_CALL_TIMEOUT,
		}
	}

	/// Append a provider; earlier providers are tried first
	pub fn with_provider(
		mut self,
		provider: Arc<dyn FeeProvider>,
		config: ProviderRuntimeConfig,
	) -> Self {
		self.providers.push(ProviderEntry { provider, config });
		self
	}

	pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
		self.call_timeout = call_timeout;
		self
	}

	pub fn provider_ids(&self) -> Vec<&str> {
		self.providers
			.iter()
			.map(|entry| entry.provider.id())
			.collect()
	}

	pub fn chains(&self) -> &ChainRegistry {
		&self.chains
	}

	/// Quote the fee for one token and direction
	///
	/// Never fails: every outcome is reported through the result's status.
	pub async fn quote(&self, request: &FeeQuoteRequest) -> FeeQuoteResult {
		let symbol = request.token.symbol.as_str();

		let Some(price) = request.usable_price() else {
			debug!(
				"No usable price for {} on {}, skipping providers",
				symbol, request.source_chain
			);
			return FeeQuoteResult::no_price(symbol);
		};

		if let Err(e) = request.validate() {
			return FeeQuoteResult::invalid_input(e.to_string());
		}

		let (source_chain, dest_chain) = match (
			self.chains.get(&request.source_chain),
			self.chains.get(&request.dest_chain),
		) {
			(Some(source), Some(dest)) => (source, dest),
			(None, _) => return Self::unknown_chain(&request.source_chain),
			(_, None) => return Self::unknown_chain(&request.dest_chain),
		};

		let amount_human = match human_amount_from_usd(request.usd_amount, price) {
			Ok(amount) => amount,
			Err(e) => return FeeQuoteResult::invalid_input(e.to_string()),
		};
		let amount_raw = match to_minimal_units(amount_human, request.decimals) {
			Ok(raw) if !raw.is_zero() => raw,
			Ok(_) => {
				return FeeQuoteResult::invalid_input(format!(
					"{} {} rounds to zero minimal units",
					amount_human, symbol
				))
			}
			Err(e) => return FeeQuoteResult::invalid_input(e.to_string()),
		};

		let provider_request = ProviderQuoteRequest {
			symbol: symbol.to_string(),
			source_chain: source_chain.clone(),
			dest_chain: dest_chain.clone(),
			source_token_address: request.source_address().map(str::to_string),
			dest_token_address: request.dest_address().map(str::to_string),
			amount_raw,
			amount_human,
			decimals: request.decimals,
		};

		let mut attempts = Vec::with_capacity(self.providers.len());
		for entry in &self.providers {
			if let Some(quoted) = self
				.attempt(entry, &provider_request, price, &mut attempts)
				.await
			{
				info!(
					"{} {} -> {}: {} bps via {}",
					symbol,
					source_chain.name,
					dest_chain.name,
					quoted.fee_basis_points,
					quoted.provider_name
				);
				return match entry.provider.kind().quote_status() {
					FeeQuoteStatus::Success => FeeQuoteResult::success(quoted, attempts),
					_ => FeeQuoteResult::estimated(quoted, attempts),
				};
			}
		}

		let status = FeeQuoteStatus::exhausted(&attempts);
		let reason = if attempts.is_empty() {
			"No fee providers configured".to_string()
		} else {
			let details: Vec<String> = attempts
				.iter()
				.map(|attempt| {
					format!(
						"{}: {}",
						attempt.provider_id,
						attempt.message.as_deref().unwrap_or(attempt.status.as_str())
					)
				})
				.collect();
			format!("All providers failed ({})", details.join("; "))
		};

		warn!(
			"No quote for {} {} -> {}: {}",
			symbol, source_chain.name, dest_chain.name, reason
		);
		FeeQuoteResult::failure(status, reason, attempts)
	}

	/// One provider attempt; records its outcome and returns the fee when usable
	async fn attempt(
		&self,
		entry: &ProviderEntry,
		request: &ProviderQuoteRequest,
		price: Decimal,
		attempts: &mut Vec<ProviderAttempt>,
	) -> Option<QuotedFee> {
		let provider = &entry.provider;
		let provider_id = provider.id();

		if !provider.supports_token(&request.symbol) {
			debug!("{} does not support token {}", provider_id, request.symbol);
			attempts.push(ProviderAttempt::skipped(
				provider_id,
				FeeQuoteStatus::UnsupportedToken,
				format!("token {} not supported", request.symbol),
			));
			return None;
		}

		if let Some(chain) = Self::unsupported_chain(provider.as_ref(), request) {
			debug!("{} does not support chain {}", provider_id, chain.name);
			attempts.push(ProviderAttempt::skipped(
				provider_id,
				FeeQuoteStatus::UnsupportedChain,
				format!("chain {} not supported", chain.name),
			));
			return None;
		}

		let started = Instant::now();
		let outcome = timeout(
			self.call_timeout,
			provider.quote_fee(request, &entry.config),
		)
		.await;
		let elapsed_ms = started.elapsed().as_millis() as u64;

		let quote = match outcome {
			Ok(Ok(quote)) => quote,
			Ok(Err(e)) => {
				let status = e.failure_kind().status();
				debug!("{} failed with {}: {}", provider_id, status, e);
				attempts.push(ProviderAttempt::failed(
					provider_id,
					status,
					e.to_string(),
					elapsed_ms,
				));
				return None;
			}
			Err(_) => {
				warn!(
					"{} timed out after {}ms",
					provider_id,
					self.call_timeout.as_millis()
				);
				attempts.push(ProviderAttempt::failed(
					provider_id,
					FeeQuoteStatus::ProviderError,
					format!("timed out after {}ms", self.call_timeout.as_millis()),
					elapsed_ms,
				));
				return None;
			}
		};

		let fee_raw = match quote {
			ProviderQuote::TotalFee { fee_raw } => fee_raw,
			ProviderQuote::OutputAmount { amount_out_raw } => {
				if amount_out_raw >= request.amount_raw {
					BigUint::zero()
				} else {
					&request.amount_raw - amount_out_raw
				}
			}
		};

		let usd = match fee_usd(&fee_raw, request.decimals, price) {
			Ok(usd) => usd,
			Err(e) => {
				attempts.push(ProviderAttempt::failed(
					provider_id,
					FeeQuoteStatus::ProviderError,
					format!("fee {} could not be priced: {}", fee_raw, e),
					elapsed_ms,
				));
				return None;
			}
		};

		attempts.push(ProviderAttempt::quoted(
			provider_id,
			provider.kind().quote_status(),
			elapsed_ms,
		));

		Some(QuotedFee {
			provider_name: provider.name().to_string(),
			fee_basis_points: basis_points(&fee_raw, &request.amount_raw),
			fee_usd: usd,
			fee_raw,
			amount_raw: request.amount_raw.clone(),
		})
	}

	fn unsupported_chain<'a>(
		provider: &dyn FeeProvider,
		request: &'a ProviderQuoteRequest,
	) -> Option<&'a ChainDescriptor> {
		[&request.source_chain, &request.dest_chain]
			.into_iter()
			.find(|chain| !provider.supports_chain(chain))
	}

	fn unknown_chain(chain: &str) -> FeeQuoteResult {
		FeeQuoteResult::failure(
			FeeQuoteStatus::UnsupportedChain,
			format!("Unknown chain: {}", chain),
			Vec::new(),
		)
	}

	/// Health of every provider, keyed by provider ID
	pub async fn health_check_all(&self) -> HashMap<String, bool> {
		let checks = self.providers.iter().map(|entry| async move {
			let provider_id = entry.provider.id().to_string();
			let healthy = match timeout(
				self.call_timeout,
				entry.provider.health_check(&entry.config),
			)
			.await
			{
				Ok(Ok(healthy)) => healthy,
				Ok(Err(e)) => {
					warn!("Health check failed for {}: {}", provider_id, e);
					false
				}
				Err(_) => {
					warn!("Health check timed out for {}", provider_id);
					false
				}
			};
			(provider_id, healthy)
		});

		join_all(checks).await.into_iter().collect()
	}
}
