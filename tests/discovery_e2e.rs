//! End-to-end tests for discovery runs

mod mocks;

use std::sync::Arc;

use mocks::fixtures;
use mocks::RouteTransport;
use rust_decimal_macros::dec;
use xfee_scanner::mocks::{mock_pool, InMemoryPoolSource, InMemoryPriceSource, MockFeeProvider};
use xfee_scanner::models::{FeeQuoteStatus, ProviderRuntimeConfig, QuoteDirection};
use xfee_scanner::num_bigint::BigUint;
use xfee_scanner::serde_json::{json, Value};
use xfee_scanner::{DiscoveryError, ScannerBuilder};

fn mock_config(id: &str) -> ProviderRuntimeConfig {
	ProviderRuntimeConfig::new(id, "http://mock.invalid", 5_000)
}

fn subgraph_pool(id: &str, liquidity: &str, token0: (&str, &str, u8), token1: (&str, &str, u8)) -> Value {
	let token = |(address, symbol, decimals): (&str, &str, u8)| {
		json!({ "id": address, "symbol": symbol, "name": symbol, "decimals": decimals.to_string() })
	};
	json!({
		"id": id,
		"liquidity": liquidity,
		"volumeUSD": "2500.75",
		"token0": token(token0),
		"token1": token(token1)
	})
}

#[tokio::test]
async fn test_symbol_on_both_chains_is_matched_with_representative_pools() {
	let pools = InMemoryPoolSource::new()
		.with_pools("ethereum", vec![mock_pool("eth-usdc", 1000, ("USDC", 6), ("DAI", 18))])
		.with_pools("polygon", vec![mock_pool("poly-usdc", 2000, ("USDC", 6), ("WMATIC", 18))]);

	let scanner = ScannerBuilder::new()
		.with_settings(fixtures::settings())
		.with_pool_source(Arc::new(pools))
		.with_price_source(Arc::new(InMemoryPriceSource::new().with_price("USDC", dec!(1))))
		.with_provider(Arc::new(MockFeeProvider::bridge("hop", 10)), mock_config("hop"))
		.build()
		.unwrap();

	let report = scanner.discover().await.unwrap();

	assert_eq!(report.matched.len(), 1);
	let usdc = &report.matched[0];
	assert_eq!(usdc.symbol, "USDC");
	assert_eq!(
		usdc.chain("ethereum").unwrap().representative_pool_liquidity,
		BigUint::from(1000u32)
	);
	assert_eq!(usdc.chain("ethereum").unwrap().representative_pool_id, "eth-usdc");
	assert_eq!(
		usdc.chain("polygon").unwrap().representative_pool_liquidity,
		BigUint::from(2000u32)
	);

	assert_eq!(report.pool_counts.get("ethereum"), Some(&1));
	assert_eq!(report.token_counts.get("polygon"), Some(&2));

	let quotes = report.quotes_for("usdc");
	assert_eq!(quotes.len(), 2);
	assert_eq!(quotes[0].direction, QuoteDirection::Forward);
	assert_eq!(quotes[0].source_chain, "ethereum");
	assert_eq!(quotes[1].direction, QuoteDirection::Reverse);
	assert_eq!(quotes[1].source_chain, "polygon");
	for quote in quotes {
		assert_eq!(quote.result.status(), FeeQuoteStatus::Success);
		assert_eq!(quote.result.fee().unwrap().fee_basis_points, 10);
		assert_eq!(quote.result.fee().unwrap().fee_usd, dec!(1));
	}

	assert_eq!(report.summary.matched_tokens, 1);
	assert_eq!(report.summary.quoted, 2);
	assert_eq!(report.summary.failed, 0);
}

#[tokio::test]
async fn test_no_overlap_produces_empty_report() {
	let pools = InMemoryPoolSource::new()
		.with_pools("ethereum", vec![mock_pool("a", 1000, ("USDC", 6), ("DAI", 18))])
		.with_pools("polygon", vec![mock_pool("b", 1000, ("WMATIC", 18), ("QUICK", 18))]);
	let hop = MockFeeProvider::bridge("hop", 10);

	let scanner = ScannerBuilder::new()
		.with_settings(fixtures::settings())
		.with_pool_source(Arc::new(pools))
		.with_price_source(Arc::new(InMemoryPriceSource::new()))
		.with_provider(Arc::new(hop), mock_config("hop"))
		.build()
		.unwrap();

	let report = scanner.discover().await.unwrap();
	assert!(report.matched.is_empty());
	assert!(report.quotes.is_empty());
	assert_eq!(report.summary.quotes, 0);
}

#[tokio::test]
async fn test_unpriced_token_is_reported_without_fee() {
	let pools = InMemoryPoolSource::new()
		.with_pools("ethereum", vec![mock_pool("a", 1000, ("USDC", 6), ("NEWT", 18))])
		.with_pools("polygon", vec![mock_pool("b", 1000, ("USDC", 6), ("NEWT", 18))]);

	let scanner = ScannerBuilder::new()
		.with_settings(fixtures::settings())
		.with_pool_source(Arc::new(pools))
		.with_price_source(Arc::new(InMemoryPriceSource::new().with_price("USDC", dec!(1))))
		.with_provider(Arc::new(MockFeeProvider::aggregator("openocean", 30)), mock_config("openocean"))
		.build()
		.unwrap();

	let report = scanner.discover().await.unwrap();

	assert_eq!(report.matched.len(), 2);
	let newt = report.quotes_for("NEWT");
	assert_eq!(newt.len(), 2);
	assert!(newt.iter().all(|q| q.result.status() == FeeQuoteStatus::NoPrice));
	assert!(newt.iter().all(|q| q.price_usd.is_none()));

	let usdc = report.quotes_for("USDC");
	assert!(usdc.iter().all(|q| q.result.status() == FeeQuoteStatus::Estimated));

	assert_eq!(report.summary.no_price, 2);
	assert_eq!(report.summary.estimated, 2);
}

#[tokio::test]
async fn test_unknown_discovery_chain_fails_the_run() {
	let mut settings = fixtures::settings();
	settings.discovery.chains = vec!["ethereum".to_string(), "fantom".to_string()];

	let scanner = ScannerBuilder::new()
		.with_settings(settings)
		.with_pool_source(Arc::new(InMemoryPoolSource::new()))
		.with_price_source(Arc::new(InMemoryPriceSource::new()))
		.with_provider(Arc::new(MockFeeProvider::bridge("hop", 10)), mock_config("hop"))
		.build()
		.unwrap();

	let err = scanner.discover().await.unwrap_err();
	assert!(matches!(err, DiscoveryError::Chain(_)));
}

#[tokio::test]
async fn test_full_run_over_http() {
	let mut settings = fixtures::settings();
	if let Some(openocean) = settings.providers.get_mut("openocean") {
		openocean.enabled = false;
	}

	let transport = Arc::new(
		RouteTransport::new()
			.route(
				"https://subgraphs.test/ethereum",
				json!({ "data": { "pools": [
					subgraph_pool("0xpool1", "5000", ("0xusdc1", "USDC", 6), ("0xweth1", "WETH", 18))
				] } }),
			)
			.route(
				"https://subgraphs.test/polygon",
				json!({ "data": { "pools": [
					subgraph_pool("0xpool2", "9000", ("0xweth2", "WETH", 18), ("0xusdc2", "USDC", 6))
				] } }),
			)
			.route("https://prices.test/data/pricemulti", json!({ "USDC": { "USD": 1 } }))
			.route(
				"https://api.hop.exchange/v1/quote",
				json!({ "amountIn": "1000000000", "totalFee": "500000", "estimatedReceived": "999500000" }),
			),
	);

	let scanner = ScannerBuilder::new()
		.with_settings(settings)
		.with_transport(transport)
		.build()
		.unwrap();

	let report = scanner.discover().await.unwrap();

	let symbols: Vec<&str> = report.matched.iter().map(|m| m.symbol.as_str()).collect();
	assert_eq!(symbols, vec!["USDC", "WETH"]);
	assert_eq!(
		report.matched[0].chain("polygon").unwrap().address,
		"0xusdc2"
	);

	let usdc = report.quotes_for("USDC");
	assert_eq!(usdc.len(), 2);
	for quote in &usdc {
		assert_eq!(quote.result.status(), FeeQuoteStatus::Success);
		let fee = quote.result.fee().unwrap();
		assert_eq!(fee.provider_name, "Hop");
		assert_eq!(fee.amount_raw, BigUint::from(1_000_000_000u64));
		assert_eq!(fee.fee_basis_points, 5);
		assert_eq!(fee.fee_usd, dec!(0.5));
	}

	let weth = report.quotes_for("WETH");
	assert!(weth.iter().all(|q| q.result.status() == FeeQuoteStatus::NoPrice));

	let serialized = xfee_scanner::serde_json::to_value(&report).unwrap();
	assert_eq!(serialized["summary"]["quoted"], 2);
	assert_eq!(serialized["summary"]["noPrice"], 2);
}
