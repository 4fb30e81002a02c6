//! JSON-over-HTTP capability injected into providers and boundary clients

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;
use xfee_types::{AdapterError, AdapterResult, ProviderRuntimeConfig};

use crate::client_cache::{ClientCache, ClientConfig};

/// Minimal HTTP surface the adapters need
///
/// Paths are joined onto `config.endpoint`; an empty path targets the endpoint itself.
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
	async fn get_json(
		&self,
		config: &ProviderRuntimeConfig,
		path: &str,
		query: &[(String, String)],
	) -> AdapterResult<Value>;

	async fn post_json(
		&self,
		config: &ProviderRuntimeConfig,
		path: &str,
		body: &Value,
	) -> AdapterResult<Value>;
}

/// Client strategy for the reqwest transport
#[derive(Debug, Clone)]
enum ClientStrategy {
	/// Reuse pooled clients from a cache
	Cached(ClientCache),
	/// Build a client per request
	OnDemand,
}

/// `HttpTransport` backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	client_strategy: ClientStrategy,
}

impl ReqwestTransport {
	/// Transport over the process-wide client cache
	pub fn new() -> Self {
		Self::with_cache(ClientCache::shared())
	}

	pub fn with_cache(cache: ClientCache) -> Self {
		Self {
			client_strategy: ClientStrategy::Cached(cache),
		}
	}

	pub fn without_cache() -> Self {
		Self {
			client_strategy: ClientStrategy::OnDemand,
		}
	}

	fn get_client(&self, config: &ProviderRuntimeConfig) -> AdapterResult<Arc<Client>> {
		let client_config = ClientConfig::from(config);
		match &self.client_strategy {
			ClientStrategy::Cached(cache) => cache.get_client(&client_config),
			ClientStrategy::OnDemand => ClientCache::build_client(&client_config).map(Arc::new),
		}
	}

	fn send_error(error: reqwest::Error, config: &ProviderRuntimeConfig) -> AdapterError {
		if error.is_timeout() {
			AdapterError::Timeout {
				timeout_ms: config.timeout_ms,
			}
		} else {
			AdapterError::HttpError(error)
		}
	}

	async fn read_json(response: Response, config: &ProviderRuntimeConfig) -> AdapterResult<Value> {
		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			debug!(
				"{} returned HTTP {}: {}",
				config.provider_id,
				status.as_u16(),
				body
			);
			return Err(match error_message(&body) {
				Some(reason) => AdapterError::http_failure(status.as_u16(), reason),
				None => AdapterError::from_http_failure(status.as_u16()),
			});
		}

		response
			.json::<Value>()
			.await
			.map_err(|e| AdapterError::InvalidResponse {
				reason: format!("Failed to parse {} response: {}", config.provider_id, e),
			})
	}
}

impl Default for ReqwestTransport {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
	async fn get_json(
		&self,
		config: &ProviderRuntimeConfig,
		path: &str,
		query: &[(String, String)],
	) -> AdapterResult<Value> {
		let client = self.get_client(config)?;
		let url = config.url(path);
		debug!("GET {} ({})", url, config.provider_id);

		let response = client
			.get(&url)
			.query(query)
			.send()
			.await
			.map_err(|e| Self::send_error(e, config))?;

		Self::read_json(response, config).await
	}

	async fn post_json(
		&self,
		config: &ProviderRuntimeConfig,
		path: &str,
		body: &Value,
	) -> AdapterResult<Value> {
		let client = self.get_client(config)?;
		let url = config.url(path);
		debug!("POST {} ({})", url, config.provider_id);

		let response = client
			.post(&url)
			.json(body)
			.send()
			.await
			.map_err(|e| Self::send_error(e, config))?;

		Self::read_json(response, config).await
	}
}

/// Pull a human-readable message out of a JSON error body
pub fn error_message(body: &str) -> Option<String> {
	let value: Value = serde_json::from_str(body).ok()?;
	["error", "message", "Message"]
		.iter()
		.find_map(|key| value.get(*key).and_then(Value::as_str))
		.map(str::to_string)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_message_extraction() {
		assert_eq!(
			error_message(r#"{"error":"token is not supported on route"}"#),
			Some("token is not supported on route".to_string())
		);
		assert_eq!(
			error_message(r#"{"Response":"Error","Message":"rate limit"}"#),
			Some("rate limit".to_string())
		);
		assert_eq!(error_message("<html>bad gateway</html>"), None);
		assert_eq!(error_message(r#"{"error":{"code":1}}"#), None);
	}

	#[test]
	fn test_transport_construction() {
		assert!(matches!(
			ReqwestTransport::new().client_strategy,
			ClientStrategy::Cached(_)
		));
		assert!(matches!(
			ReqwestTransport::without_cache().client_strategy,
			ClientStrategy::OnDemand
		));
	}

	#[test]
	fn test_on_demand_client_creation() {
		let transport = ReqwestTransport::without_cache();
		let config = ProviderRuntimeConfig::new("hop", "https://api.hop.exchange", 1_000);
		assert!(transport.get_client(&config).is_ok());
	}
}
