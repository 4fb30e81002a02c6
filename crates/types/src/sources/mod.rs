//! Boundary traits for pool discovery and USD pricing

use async_trait::async_trait;
use num_bigint::BigUint;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt::Debug;
use thiserror::Error;

use crate::models::{ChainDescriptor, PoolRecord};

/// Pool and price source errors
#[derive(Error, Debug)]
pub enum SourceError {
	#[error("No {source_kind} endpoint configured for chain {chain}")]
	NotConfigured { source_kind: String, chain: String },

	#[error("Request failed: {0}")]
	Request(#[from] crate::adapters::AdapterError),

	#[error("Source returned errors: {0}")]
	Remote(String),

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Liquidity pools with liquidity above a threshold on one chain
#[async_trait]
pub trait PoolSource: Send + Sync + Debug {
	async fn fetch_pools(
		&self,
		chain: &ChainDescriptor,
		min_liquidity: &BigUint,
	) -> SourceResult<Vec<PoolRecord>>;
}

/// USD prices for a small batch of symbols
///
/// Symbols absent from the returned map have no price.
#[async_trait]
pub trait PriceSource: Send + Sync + Debug {
	async fn fetch_prices(
		&self,
		symbols: &[String],
		chain: &ChainDescriptor,
	) -> SourceResult<HashMap<String, Decimal>>;
}
