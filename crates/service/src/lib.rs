//! xfee Service
//!
//! Token aggregation, price resolution, fee quoting and the discovery run that ties them together.

pub mod discovery;
pub mod fee_engine;
pub mod price_oracle;
pub mod token_aggregator;

pub use discovery::{
	DiscoveryConfig, DiscoveryError, DiscoveryReport, DiscoveryResult, DiscoveryService,
	DiscoverySummary, TokenQuote,
};
pub use fee_engine::{FeeQuoteEngine, ProviderEntry, DEFAULT_PROVIDER_CALL_TIMEOUT};
pub use price_oracle::{PriceOracleClient, PriceOracleConfig};
pub use token_aggregator::{ChainTokens, TokenAggregator};
