//! Canned transport for adapter unit tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use xfee_types::{AdapterError, AdapterResult, ProviderRuntimeConfig};

use crate::http_transport::HttpTransport;

#[derive(Debug, Clone)]
pub struct RecordedCall {
	pub path: String,
	pub query: Vec<(String, String)>,
	pub body: Option<Value>,
}

impl RecordedCall {
	pub fn param(&self, key: &str) -> Option<&str> {
		self.query
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}
}

/// Answers by path, records every call
#[derive(Debug, Default)]
pub struct CannedTransport {
	responses: HashMap<String, Value>,
	failures: HashMap<String, (u16, String)>,
	calls: Mutex<Vec<RecordedCall>>,
}

impl CannedTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn respond(mut self, path: &str, body: Value) -> Self {
		self.responses.insert(path.to_string(), body);
		self
	}

	pub fn fail(mut self, path: &str, status_code: u16, reason: &str) -> Self {
		self.failures
			.insert(path.to_string(), (status_code, reason.to_string()));
		self
	}

	pub fn calls(&self) -> Vec<RecordedCall> {
		self.calls.lock().unwrap().clone()
	}

	fn answer(&self, call: RecordedCall) -> AdapterResult<Value> {
		let path = call.path.clone();
		self.calls.lock().unwrap().push(call);

		if let Some((status_code, reason)) = self.failures.get(&path) {
			return Err(AdapterError::http_failure(*status_code, reason.clone()));
		}
		self.responses
			.get(&path)
			.cloned()
			.ok_or_else(|| AdapterError::from_http_failure(404))
	}
}

#[async_trait]
impl HttpTransport for CannedTransport {
	async fn get_json(
		&self,
		_config: &ProviderRuntimeConfig,
		path: &str,
		query: &[(String, String)],
	) -> AdapterResult<Value> {
		self.answer(RecordedCall {
			path: path.to_string(),
			query: query.to_vec(),
			body: None,
		})
	}

	async fn post_json(
		&self,
		_config: &ProviderRuntimeConfig,
		path: &str,
		body: &Value,
	) -> AdapterResult<Value> {
		self.answer(RecordedCall {
			path: path.to_string(),
			query: Vec::new(),
			body: Some(body.clone()),
		})
	}
}
