//! HTTP client cache for connection reuse across provider and source calls
//!
//! Clients are keyed by endpoint, timeout and headers so every API gets its own pool.

use dashmap::DashMap;
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use xfee_types::{AdapterError, AdapterResult, ProviderRuntimeConfig};

const USER_AGENT: &str = "xfee-scanner/0.1";

/// Configuration for creating pooled HTTP clients
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientConfig {
	/// Base endpoint of the API
	pub base_url: String,
	/// Provider identifier for cache differentiation
	pub provider_id: String,
	/// Per-request timeout
	pub timeout_ms: u64,
	/// Maximum number of idle connections per host
	pub max_idle_per_host: usize,
	/// Connection keep-alive timeout
	pub keep_alive_timeout_ms: u64,
	/// Default headers, including the API key when configured
	pub headers: Vec<(String, String)>,
}

impl From<&ProviderRuntimeConfig> for ClientConfig {
	fn from(runtime: &ProviderRuntimeConfig) -> Self {
		let mut headers = vec![
			("User-Agent".to_string(), USER_AGENT.to_string()),
			("Accept".to_string(), "application/json".to_string()),
		];

		if let Some(extra) = &runtime.headers {
			let mut extra: Vec<_> = extra.iter().collect();
			extra.sort();
			for (key, value) in extra {
				headers.push((key.clone(), value.clone()));
			}
		}

		if let Some(api_key) = &runtime.api_key {
			headers.push((
				runtime.api_key_header.clone(),
				api_key.expose_secret().to_string(),
			));
		}

		Self {
			base_url: runtime.endpoint.clone(),
			provider_id: runtime.provider_id.clone(),
			timeout_ms: runtime.timeout_ms,
			max_idle_per_host: 10,
			keep_alive_timeout_ms: 90_000,
			headers,
		}
	}
}

/// Cached client with creation timestamp for TTL management
#[derive(Debug, Clone)]
struct CachedClient {
	client: Arc<Client>,
	created_at: Instant,
}

impl CachedClient {
	fn new(client: Client) -> Self {
		Self {
			client: Arc::new(client),
			created_at: Instant::now(),
		}
	}

	fn is_expired(&self, ttl: Duration) -> bool {
		self.created_at.elapsed() > ttl
	}
}

/// Thread-safe cache of HTTP clients with TTL
#[derive(Clone, Debug)]
pub struct ClientCache {
	clients: Arc<DashMap<ClientConfig, CachedClient>>,
	ttl: Duration,
}

impl ClientCache {
	/// Create a new client cache with default 30-minute TTL
	pub fn new() -> Self {
		Self::with_ttl(Duration::from_secs(30 * 60))
	}

	/// Create a new client cache with custom TTL
	pub fn with_ttl(ttl: Duration) -> Self {
		Self {
			clients: Arc::new(DashMap::new()),
			ttl,
		}
	}

	/// Process-wide cache shared by transports
	pub fn shared() -> Self {
		GLOBAL_CLIENT_CACHE.clone()
	}

	/// Get or create a client for the given configuration
	pub fn get_client(&self, config: &ClientConfig) -> AdapterResult<Arc<Client>> {
		self.clients.remove_if(config, |_, cached_client| {
			let is_expired = cached_client.is_expired(self.ttl);
			if is_expired {
				warn!(
					"Client cache expired for {} (age: {:?}), will create new client",
					config.base_url,
					cached_client.created_at.elapsed()
				);
			}
			is_expired
		});

		if let Some(cached_client_ref) = self.clients.get(config) {
			let cached_client = cached_client_ref.value();
			debug!(
				"Reusing cached client for {} (age: {:?})",
				config.base_url,
				cached_client.created_at.elapsed()
			);
			return Ok(cached_client.client.clone());
		}

		debug!("Creating new client for {}", config.base_url);
		let cached_client = CachedClient::new(Self::build_client(config)?);
		let client_arc = cached_client.client.clone();

		use dashmap::mapref::entry::Entry;

		match self.clients.entry(config.clone()) {
			Entry::Occupied(entry) => {
				debug!(
					"Another task created client for {}, using existing",
					config.base_url
				);
				return Ok(entry.get().client.clone());
			}
			Entry::Vacant(entry) => {
				entry.insert(cached_client);
			}
		}

		Ok(client_arc)
	}

	/// Build a pooled client without caching it
	pub fn build_client(config: &ClientConfig) -> AdapterResult<Client> {
		let mut builder = ClientBuilder::new()
			.timeout(Duration::from_millis(config.timeout_ms))
			.pool_max_idle_per_host(config.max_idle_per_host)
			.pool_idle_timeout(Duration::from_millis(config.keep_alive_timeout_ms))
			.tcp_keepalive(Duration::from_secs(60));

		let mut header_map = reqwest::header::HeaderMap::new();
		for (key, value) in &config.headers {
			match (
				reqwest::header::HeaderName::from_bytes(key.as_bytes()),
				reqwest::header::HeaderValue::from_str(value),
			) {
				(Ok(header_name), Ok(header_value)) => {
					header_map.insert(header_name, header_value);
				}
				_ => warn!(
					"Skipping invalid header {} for {}",
					key, config.provider_id
				),
			}
		}
		builder = builder.default_headers(header_map);

		builder.build().map_err(AdapterError::HttpError)
	}

	/// Remove all expired clients from the cache
	pub fn cleanup_expired(&self) -> usize {
		let mut removed_count = 0;

		self.clients.retain(|config, cached_client| {
			let is_expired = cached_client.is_expired(self.ttl);
			if is_expired {
				removed_count += 1;
				debug!("Removed expired client for {}", config.base_url);
			}
			!is_expired
		});

		removed_count
	}

	pub fn len(&self) -> usize {
		self.clients.len()
	}

	pub fn is_empty(&self) -> bool {
		self.clients.is_empty()
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}
}

impl Default for ClientCache {
	fn default() -> Self {
		Self::new()
	}
}

lazy_static::lazy_static! {
	static ref GLOBAL_CLIENT_CACHE: ClientCache = ClientCache::new();
}
