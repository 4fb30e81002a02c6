//! Tokens, requests and settings shared across tests

#![allow(dead_code)]

use rust_decimal::Decimal;
use xfee_scanner::config::{EndpointSettings, Settings};
use xfee_scanner::models::{FeeQuoteRequest, Token};

pub const USDC_ETHEREUM: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
pub const USDC_POLYGON: &str = "0x3c499c542cef5e3811e1192ce70d8cc03d5c3359";

pub fn usdc() -> Token {
	Token::new("USDC", "USD Coin", 6)
		.with_address("ethereum", USDC_ETHEREUM)
		.with_address("polygon", USDC_POLYGON)
}

/// USDC from ethereum to polygon
pub fn usdc_request(usd_amount: Decimal, price: Option<Decimal>) -> FeeQuoteRequest {
	FeeQuoteRequest::new(usdc(), "ethereum", "polygon", usd_amount, price)
}

/// Default settings with subgraph endpoints for ethereum and polygon
pub fn settings() -> Settings {
	let mut settings = Settings::default();
	settings.subgraphs.insert(
		"ethereum".to_string(),
		EndpointSettings::new("https://subgraphs.test/ethereum"),
	);
	settings.subgraphs.insert(
		"polygon".to_string(),
		EndpointSettings::new("https://subgraphs.test/polygon"),
	);
	settings.prices.endpoint = "https://prices.test".to_string();
	settings.prices.batch_delay_ms = 0;
	settings.discovery.min_liquidity = "0".to_string();
	settings
}
