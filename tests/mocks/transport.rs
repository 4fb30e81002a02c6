//! Path-routed HTTP transport for driving the real adapters offline

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use xfee_scanner::adapters::HttpTransport;
use xfee_scanner::models::{AdapterError, AdapterResult, ProviderRuntimeConfig};
use xfee_scanner::serde_json::Value;

/// Answers by `endpoint/path`; unknown routes are HTTP 404
#[derive(Debug, Default)]
pub struct RouteTransport {
	routes: HashMap<String, Value>,
	requests: Mutex<Vec<String>>,
}

impl RouteTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn route(mut self, url: &str, body: Value) -> Self {
		self.routes.insert(url.trim_end_matches('/').to_string(), body);
		self
	}

	/// URLs requested so far, in order
	pub fn requests(&self) -> Vec<String> {
		self.requests.lock().unwrap().clone()
	}

	fn answer(&self, config: &ProviderRuntimeConfig, path: &str) -> AdapterResult<Value> {
		let url = config.url(path);
		self.requests.lock().unwrap().push(url.clone());
		self.routes
			.get(&url)
			.cloned()
			.ok_or_else(|| AdapterError::http_failure(404, format!("no route for {}", url)))
	}
}

#[async_trait]
impl HttpTransport for RouteTransport {
	async fn get_json(
		&self,
		config: &ProviderRuntimeConfig,
		path: &str,
		_query: &[(String, String)],
	) -> AdapterResult<Value> {
		self.answer(config, path)
	}

	async fn post_json(
		&self,
		config: &ProviderRuntimeConfig,
		path: &str,
		_body: &Value,
	) -> AdapterResult<Value> {
		self.answer(config, path)
	}
}
