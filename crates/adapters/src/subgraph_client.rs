//! Liquidity subgraph pool source
//!
//! Posts a GraphQL query for the deepest pools above a liquidity threshold to the chain's
//! subgraph endpoint.

use async_trait::async_trait;
use num_bigint::BigUint;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};
use xfee_types::math::parse_unsigned;
use xfee_types::{
	ChainDescriptor, PoolRecord, PoolSource, PoolToken, ProviderRuntimeConfig, SourceError,
	SourceResult,
};

use crate::http_transport::HttpTransport;

/// Page size of the pools query
pub const POOLS_PAGE_SIZE: u32 = 1000;

const POOLS_QUERY: &str = r#"query Pools($first: Int!, $threshold: BigInt!) {
  pools(first: $first, orderBy: liquidity, orderDirection: desc, where: { liquidity_gt: $threshold }) {
    id
    liquidity
    volumeUSD
    token0 { id symbol name decimals }
    token1 { id symbol name decimals }
  }
}"#;

// ================================
// SUBGRAPH MODELS
// ================================

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
	data: Option<PoolsData>,
	#[serde(default)]
	errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
	message: String,
}

#[derive(Debug, Deserialize)]
struct PoolsData {
	#[serde(default)]
	pools: Vec<Value>,
}

/// Pool as returned by the subgraph; numeric fields are decimal strings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubgraphPool {
	id: String,
	liquidity: String,
	#[serde(rename = "volumeUSD")]
	volume_usd: String,
	token0: SubgraphToken,
	token1: SubgraphToken,
}

#[derive(Debug, Deserialize)]
struct SubgraphToken {
	id: String,
	symbol: String,
	name: String,
	decimals: Value,
}

impl SubgraphToken {
	fn into_pool_token(self) -> Result<PoolToken, String> {
		let decimals = match &self.decimals {
			Value::String(text) => text.trim().parse::<u8>().ok(),
			Value::Number(number) => number.as_u64().and_then(|d| u8::try_from(d).ok()),
			_ => None,
		}
		.ok_or_else(|| format!("token {} has invalid decimals {}", self.id, self.decimals))?;

		Ok(PoolToken::new(self.id, self.symbol, self.name, decimals))
	}
}

impl SubgraphPool {
	fn into_record(self) -> Result<PoolRecord, String> {
		let liquidity = parse_unsigned(&self.liquidity)
			.map_err(|e| format!("pool {} liquidity: {}", self.id, e))?;
		let volume_usd = parse_volume(&self.volume_usd)
			.ok_or_else(|| format!("pool {} volumeUSD {:?}", self.id, self.volume_usd))?;

		Ok(PoolRecord::new(
			self.id,
			liquidity,
			volume_usd,
			self.token0.into_pool_token()?,
			self.token1.into_pool_token()?,
		))
	}
}

fn parse_volume(text: &str) -> Option<Decimal> {
	let text = text.trim();
	Decimal::from_str(text)
		.or_else(|_| Decimal::from_scientific(text))
		.ok()
}

/// `PoolSource` over per-chain subgraph endpoints
#[derive(Debug)]
pub struct SubgraphPoolSource {
	endpoints: HashMap<String, ProviderRuntimeConfig>,
	transport: Arc<dyn HttpTransport>,
}

impl SubgraphPoolSource {
	pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
		Self {
			endpoints: HashMap::new(),
			transport,
		}
	}

	/// Register the subgraph endpoint for a chain
	pub fn with_endpoint(mut self, chain: &str, config: ProviderRuntimeConfig) -> Self {
		self.endpoints.insert(chain.to_lowercase(), config);
		self
	}

	pub fn has_endpoint(&self, chain: &str) -> bool {
		self.endpoints.contains_key(&chain.to_lowercase())
	}

	/// Convert raw pool objects, skipping malformed ones
	fn parse_pools(chain: &str, pools: Vec<Value>) -> Vec<PoolRecord> {
		let total = pools.len();
		let records: Vec<PoolRecord> = pools
			.into_iter()
			.filter_map(|raw| {
				let parsed = serde_json::from_value::<SubgraphPool>(raw)
					.map_err(|e| e.to_string())
					.and_then(SubgraphPool::into_record);
				match parsed {
					Ok(record) => Some(record),
					Err(reason) => {
						warn!("Skipping malformed pool on {}: {}", chain, reason);
						None
					}
				}
			})
			.collect();

		if records.len() < total {
			warn!(
				"{} of {} pools on {} were malformed",
				total - records.len(),
				total,
				chain
			);
		}
		records
	}
}

#[async_trait]
impl PoolSource for SubgraphPoolSource {
	async fn fetch_pools(
		&self,
		chain: &ChainDescriptor,
		min_liquidity: &BigUint,
	) -> SourceResult<Vec<PoolRecord>> {
		let config = self
			.endpoints
			.get(&chain.key())
			.ok_or_else(|| SourceError::NotConfigured {
				source_kind: "subgraph".to_string(),
				chain: chain.name.clone(),
			})?;

		let body = json!({
			"query": POOLS_QUERY,
			"variables": {
				"first": POOLS_PAGE_SIZE,
				"threshold": min_liquidity.to_string(),
			},
		});

		debug!(
			"Querying pools on {} with liquidity > {}",
			chain.name, min_liquidity
		);
		let response = self.transport.post_json(config, "", &body).await?;
		let response: GraphQlResponse =
			serde_json::from_value(response).map_err(|e| SourceError::InvalidResponse {
				reason: e.to_string(),
			})?;

		if !response.errors.is_empty() {
			let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
			return Err(SourceError::Remote(messages.join("; ")));
		}

		let pools = response
			.data
			.ok_or_else(|| SourceError::InvalidResponse {
				reason: "subgraph response has no data".to_string(),
			})?
			.pools;

		let records = Self::parse_pools(&chain.name, pools);
		info!("Fetched {} pools on {}", records.len(), chain.name);
		Ok(records)
	}
}
