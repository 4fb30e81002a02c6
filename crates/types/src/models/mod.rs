//! Domain models shared across the scanner crates

pub mod chain;
pub mod pool;
pub mod price;
pub mod secret_string;
pub mod token;

pub use chain::{ChainDescriptor, ChainRegistry, ChainRegistryError, ProviderKind};
pub use pool::{AggregatedToken, ChainTokenSummary, MatchedToken, PoolRecord};
pub use price::{PriceMap, PriceQuote};
pub use secret_string::SecretString;
pub use token::{PoolToken, Token};
