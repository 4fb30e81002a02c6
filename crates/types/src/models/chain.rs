//! Chain descriptors and the static chain registry

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

use crate::quotes::FeeQuoteStatus;

/// Fee quote provider families a chain can be served by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
	/// Bridging protocol returning an authoritative total fee
	Hop,
	/// Swap aggregator whose output amount is used to estimate the fee
	SwapAggregator,
}

impl ProviderKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ProviderKind::Hop => "hop",
			ProviderKind::SwapAggregator => "swap-aggregator",
		}
	}

	/// Status reported for a usable quote from this kind of provider
	pub fn quote_status(&self) -> FeeQuoteStatus {
		match self {
			ProviderKind::Hop => FeeQuoteStatus::Success,
			ProviderKind::SwapAggregator => FeeQuoteStatus::Estimated,
		}
	}
}

impl fmt::Display for ProviderKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Static identity and capabilities of one blockchain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainDescriptor {
	/// Logical chain name (e.g. "ethereum", "polygon")
	pub name: String,
	/// EVM chain ID
	pub chain_id: u64,
	/// Chain slug understood by the bridging protocol
	pub bridging_protocol_id: String,
	/// Chain code understood by the swap aggregator, if it serves this chain
	pub aggregator_chain_code: Option<String>,
	/// Provider families available on this chain
	pub supported_providers: BTreeSet<ProviderKind>,
}

impl ChainDescriptor {
	pub fn new(
		name: impl Into<String>,
		chain_id: u64,
		bridging_protocol_id: impl Into<String>,
	) -> Self {
		Self {
			name: name.into(),
			chain_id,
			bridging_protocol_id: bridging_protocol_id.into(),
			aggregator_chain_code: None,
			supported_providers: BTreeSet::new(),
		}
	}

	pub fn with_provider(mut self, kind: ProviderKind) -> Self {
		self.supported_providers.insert(kind);
		self
	}

	/// Set the swap aggregator chain code and mark the aggregator as available
	pub fn with_aggregator_code(mut self, code: impl Into<String>) -> Self {
		self.aggregator_chain_code = Some(code.into());
		self.supported_providers.insert(ProviderKind::SwapAggregator);
		self
	}

	pub fn supports(&self, kind: ProviderKind) -> bool {
		self.supported_providers.contains(&kind)
	}

	/// Registry key for this chain
	pub fn key(&self) -> String {
		self.name.to_lowercase()
	}
}

/// Well-known chains
impl ChainDescriptor {
	pub fn ethereum() -> Self {
		Self::new("ethereum", 1, "ethereum")
			.with_provider(ProviderKind::Hop)
			.with_aggregator_code("eth")
	}

	pub fn optimism() -> Self {
		Self::new("optimism", 10, "optimism")
			.with_provider(ProviderKind::Hop)
			.with_aggregator_code("optimism")
	}

	pub fn arbitrum() -> Self {
		Self::new("arbitrum", 42161, "arbitrum")
			.with_provider(ProviderKind::Hop)
			.with_aggregator_code("arbitrum")
	}

	pub fn polygon() -> Self {
		Self::new("polygon", 137, "polygon")
			.with_provider(ProviderKind::Hop)
			.with_aggregator_code("polygon")
	}

	pub fn base() -> Self {
		Self::new("base", 8453, "base")
			.with_provider(ProviderKind::Hop)
			.with_aggregator_code("base")
	}

	pub fn gnosis() -> Self {
		Self::new("gnosis", 100, "gnosis")
			.with_provider(ProviderKind::Hop)
			.with_aggregator_code("xdai")
	}
}

/// Chain registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainRegistryError {
	#[error("Chain already registered: {name}")]
	DuplicateChain { name: String },

	#[error("Unknown chain: {name}")]
	UnknownChain { name: String },
}

/// Lookup table from logical chain name to its descriptor
///
/// Names are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
	chains: HashMap<String, ChainDescriptor>,
}

impl ChainRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry with the built-in chains
	pub fn with_defaults() -> Self {
		let mut registry = Self::new();
		for chain in [
			ChainDescriptor::ethereum(),
			ChainDescriptor::optimism(),
			ChainDescriptor::arbitrum(),
			ChainDescriptor::polygon(),
			ChainDescriptor::base(),
			ChainDescriptor::gnosis(),
		] {
			registry.chains.insert(chain.key(), chain);
		}
		registry
	}

	/// Add a chain, rejecting names that are already taken
	pub fn register(&mut self, chain: ChainDescriptor) -> Result<(), ChainRegistryError> {
		let key = chain.key();
		if self.chains.contains_key(&key) {
			return Err(ChainRegistryError::DuplicateChain { name: chain.name });
		}
		self.chains.insert(key, chain);
		Ok(())
	}

	/// Add or replace a chain
	pub fn upsert(&mut self, chain: ChainDescriptor) {
		self.chains.insert(chain.key(), chain);
	}

	pub fn get(&self, name: &str) -> Option<&ChainDescriptor> {
		self.chains.get(&name.to_lowercase())
	}

	pub fn require(&self, name: &str) -> Result<&ChainDescriptor, ChainRegistryError> {
		self.get(name).ok_or_else(|| ChainRegistryError::UnknownChain {
			name: name.to_string(),
		})
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Registered chain names, sorted
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.chains.keys().cloned().collect();
		names.sort();
		names
	}

	pub fn len(&self) -> usize {
		self.chains.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chains.is_empty()
	}
}
