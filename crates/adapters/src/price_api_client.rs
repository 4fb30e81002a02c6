//! USD price API client (CryptoCompare `pricemulti` shape)

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};
use xfee_types::{ChainDescriptor, PriceSource, ProviderRuntimeConfig, SourceError, SourceResult};

use crate::http_transport::HttpTransport;

const QUOTE_CURRENCY: &str = "USD";

/// `PriceSource` backed by the `/data/pricemulti` endpoint
#[derive(Debug)]
pub struct PriceApiClient {
	config: ProviderRuntimeConfig,
	transport: Arc<dyn HttpTransport>,
}

impl PriceApiClient {
	pub fn new(config: ProviderRuntimeConfig, transport: Arc<dyn HttpTransport>) -> Self {
		Self { config, transport }
	}

	/// Extract `{SYMBOL: {USD: price}}` entries; anything else is treated as no price
	fn parse_prices(body: &Value) -> SourceResult<HashMap<String, Decimal>> {
		if body.get("Response").and_then(Value::as_str) == Some("Error") {
			let message = body
				.get("Message")
				.and_then(Value::as_str)
				.unwrap_or("unknown price API error");
			return Err(SourceError::Remote(message.to_string()));
		}

		let entries = body.as_object().ok_or_else(|| SourceError::InvalidResponse {
			reason: "price response is not an object".to_string(),
		})?;

		let mut prices = HashMap::new();
		for (symbol, quotes) in entries {
			match quotes.get(QUOTE_CURRENCY).and_then(decimal_from_json) {
				Some(price) => {
					prices.insert(symbol.clone(), price);
				}
				None => debug!("No {} price for {}", QUOTE_CURRENCY, symbol),
			}
		}
		Ok(prices)
	}
}

/// JSON number to `Decimal` through its textual form, so no binary float math is applied
fn decimal_from_json(value: &Value) -> Option<Decimal> {
	let text = match value {
		Value::Number(number) => number.to_string(),
		Value::String(text) => text.trim().to_string(),
		_ => return None,
	};
	Decimal::from_str(&text)
		.or_else(|_| Decimal::from_scientific(&text))
		.ok()
}

#[async_trait]
impl PriceSource for PriceApiClient {
	async fn fetch_prices(
		&self,
		symbols: &[String],
		chain: &ChainDescriptor,
	) -> SourceResult<HashMap<String, Decimal>> {
		if symbols.is_empty() {
			return Ok(HashMap::new());
		}

		let query = vec![
			("fsyms".to_string(), symbols.join(",")),
			("tsyms".to_string(), QUOTE_CURRENCY.to_string()),
		];

		debug!("Fetching {} prices for {}", symbols.len(), chain.name);
		let body = self
			.transport
			.get_json(&self.config, "data/pricemulti", &query)
			.await?;

		let prices = Self::parse_prices(&body)?;
		if prices.len() < symbols.len() {
			warn!(
				"Price API returned {} of {} requested prices on {}",
				prices.len(),
				symbols.len(),
				chain.name
			);
		}
		Ok(prices)
	}
}
