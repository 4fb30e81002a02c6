//! xfee Types
//!
//! Shared models, boundary traits and fixed-point math for the cross-chain fee scanner.

pub mod adapters;
pub mod math;
pub mod models;
pub mod quotes;
pub mod serde_utils;
pub mod sources;

// Re-export the numeric and time crates used in public signatures
pub use chrono;
pub use num_bigint;
pub use rust_decimal;
pub use serde_json;

pub use adapters::{
	AdapterError, AdapterFactoryError, AdapterResult, FeeProvider,
	ProviderFailureKind, ProviderInfo, ProviderQuote, ProviderQuoteRequest,
	ProviderRuntimeConfig,
};

pub use math::{MathError, MathResult};

pub use models::{
	AggregatedToken, ChainDescriptor, ChainRegistry, ChainRegistryError, ChainTokenSummary,
	MatchedToken, PoolRecord, PoolToken, PriceMap, PriceQuote, ProviderKind, SecretString, Token,
};

pub use quotes::{
	AttemptOutcome, FeeQuoteRequest, FeeQuoteResult, FeeQuoteStatus, ProviderAttempt,
	QuoteDirection, QuoteValidationError, QuoteValidationResult, QuotedFee,
};

pub use sources::{PoolSource, PriceSource, SourceError, SourceResult};
