//! xfee Scanner Library
//!
//! Discovers tokens that trade on several EVM chains, prices them and quotes the cost of
//! bridging a fixed USD amount between each chain pair.

// Core domain types
pub use xfee_types::{
	chrono,
	num_bigint,
	rust_decimal,
	// External dependencies for convenience
	serde_json,
	AdapterError,
	ChainDescriptor,
	ChainRegistry,
	FeeProvider,
	FeeQuoteRequest,
	FeeQuoteResult,
	FeeQuoteStatus,
	MatchedToken,
	PoolSource,
	PriceSource,
	ProviderKind,
	ProviderRuntimeConfig,
	QuotedFee,
	Token,
};

// Service layer
pub use xfee_service::{
	DiscoveryConfig, DiscoveryError, DiscoveryReport, DiscoveryService, FeeQuoteEngine,
	PriceOracleClient, PriceOracleConfig, TokenAggregator,
};

// Adapters
pub use xfee_adapters::{AdapterFactory, HttpTransport, ProviderOptions, ReqwestTransport};

// Config
pub use xfee_config::{load_config, log_service_info, Settings};

pub mod models {
	pub use xfee_types::*;
}

pub mod config {
	pub use xfee_config::*;
}

pub mod adapters {
	pub use xfee_adapters::*;
}

pub mod service {
	pub use xfee_service::*;
}

pub mod mocks;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use xfee_adapters::{PriceApiClient, SubgraphPoolSource};
use xfee_config::{
	log_run_complete, log_run_plan, log_service_shutdown, ConfigValidationError,
	ConfigurableValueError, LogFormat, LoggingSettings,
};
use xfee_types::AdapterFactoryError;

/// Errors while wiring the scanner from settings
#[derive(Error, Debug)]
pub enum ScannerBuildError {
	#[error("Invalid configuration: {0}")]
	Config(#[from] ConfigValidationError),

	#[error("Failed to resolve credential: {0}")]
	Credential(#[from] ConfigurableValueError),

	#[error("Failed to create provider: {0}")]
	Provider(#[from] AdapterError),

	#[error("Failed to register provider: {0}")]
	Registry(#[from] AdapterFactoryError),
}

/// Builder for a configured scanner
///
/// Anything not injected is built from the settings: the HTTP transport, the subgraph pool
/// source, the price API client and the fee providers.
#[derive(Default)]
pub struct ScannerBuilder {
	settings: Option<Settings>,
	transport: Option<Arc<dyn HttpTransport>>,
	pool_source: Option<Arc<dyn PoolSource>>,
	price_source: Option<Arc<dyn PriceSource>>,
	providers: Vec<(Arc<dyn FeeProvider>, ProviderRuntimeConfig)>,
}

impl ScannerBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
		self.transport = Some(transport);
		self
	}

	pub fn with_pool_source(mut self, source: Arc<dyn PoolSource>) -> Self {
		self.pool_source = Some(source);
		self
	}

	pub fn with_price_source(mut self, source: Arc<dyn PriceSource>) -> Self {
		self.price_source = Some(source);
		self
	}

	/// Add a provider; once any is added, configured providers are not built
	pub fn with_provider(mut self, provider: Arc<dyn FeeProvider>, config: ProviderRuntimeConfig) -> Self {
		self.providers.push((provider, config));
		self
	}

	pub fn build(self) -> Result<Scanner, ScannerBuildError> {
		let settings = self.settings.unwrap_or_default();
		let request_ms = settings.timeouts.request_ms;
		let chains = Arc::new(settings.chain_registry());
		let transport = self
			.transport
			.unwrap_or_else(|| Arc::new(ReqwestTransport::new()));

		let pool_source: Arc<dyn PoolSource> = match self.pool_source {
			Some(source) => source,
			None => {
				let mut source = SubgraphPoolSource::new(Arc::clone(&transport));
				for (chain, endpoint) in &settings.subgraphs {
					let config = endpoint.runtime_config(&format!("subgraph-{}", chain), request_ms)?;
					source = source.with_endpoint(chain, config);
				}
				Arc::new(source)
			}
		};

		let price_source: Arc<dyn PriceSource> = match self.price_source {
			Some(source) => source,
			None => Arc::new(PriceApiClient::new(
				settings.prices.runtime_config(request_ms)?,
				Arc::clone(&transport),
			)),
		};

		let mut providers = self.providers;
		if providers.is_empty() {
			for (provider_id, provider) in settings.enabled_providers() {
				let options = ProviderOptions {
					token_whitelist: provider.token_whitelist.clone(),
					slippage_percent: provider.slippage_percent,
					gas_price: provider.gas_price.clone(),
				};
				let adapter = AdapterFactory::create_provider(
					&provider.provider_type,
					&options,
					Arc::clone(&transport),
				)?;
				info!(
					"Registered provider {} as {} (priority {})",
					provider_id,
					adapter.name(),
					provider.priority
				);
				providers.push((adapter, provider.runtime_config(&provider_id, request_ms)?));
			}
		}

		// Attempts are reported by adapter ID, so each may appear once
		let mut registered = HashSet::new();
		let mut engine = FeeQuoteEngine::new(Arc::clone(&chains))
			.with_call_timeout(settings.timeouts.provider_call());
		for (provider, config) in providers {
			if !registered.insert(provider.id().to_string()) {
				return Err(AdapterFactoryError::AlreadyRegistered {
					provider_id: provider.id().to_string(),
				}
				.into());
			}
			engine = engine.with_provider(provider, config);
		}

		let engine = Arc::new(engine);
		let oracle = PriceOracleClient::with_config(
			price_source,
			PriceOracleConfig {
				batch_size: settings.prices.batch_size,
				batch_delay: settings.prices.batch_delay(),
			},
		);

		let mut discovery_config = DiscoveryConfig::new(
			settings.discovery.chains.clone(),
			settings.min_liquidity()?,
			settings.discovery.usd_amount,
		);
		discovery_config.max_concurrent_quotes = settings.discovery.max_concurrent_quotes;
		discovery_config.max_tokens = settings.discovery.max_tokens;

		let discovery = DiscoveryService::new(
			Arc::clone(&chains),
			pool_source,
			oracle,
			Arc::clone(&engine),
			discovery_config,
		);

		Ok(Scanner {
			settings,
			chains,
			engine,
			discovery,
		})
	}
}

/// A fully wired scanner
#[derive(Debug, Clone)]
pub struct Scanner {
	settings: Settings,
	chains: Arc<ChainRegistry>,
	engine: Arc<FeeQuoteEngine>,
	discovery: DiscoveryService,
}

impl Scanner {
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn chains(&self) -> &ChainRegistry {
		&self.chains
	}

	pub fn engine(&self) -> &FeeQuoteEngine {
		&self.engine
	}

	/// Run one discovery pass
	pub async fn discover(&self) -> Result<DiscoveryReport, DiscoveryError> {
		self.discovery.run().await
	}

	/// Quote a single transfer outside a discovery run
	pub async fn quote(&self, request: &FeeQuoteRequest) -> FeeQuoteResult {
		self.engine.quote(request).await
	}

	pub async fn health_check(&self) -> HashMap<String, bool> {
		self.engine.health_check_all().await
	}
}

/// Install the global tracing subscriber from logging settings; `RUST_LOG` overrides the level
///
/// Panics if a global subscriber is already set.
pub fn init_tracing(logging: &LoggingSettings) {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

	match logging.format {
		LogFormat::Json => {
			let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);
			if logging.structured {
				subscriber.with_target(true).with_thread_ids(true).init();
			} else {
				subscriber.init();
			}
		}
		LogFormat::Pretty => {
			let subscriber = tracing_subscriber::fmt().pretty().with_env_filter(env_filter);
			if logging.structured {
				subscriber.with_target(true).with_thread_ids(true).init();
			} else {
				subscriber.init();
			}
		}
		LogFormat::Compact => {
			let subscriber = tracing_subscriber::fmt().compact().with_env_filter(env_filter);
			if logging.structured {
				subscriber.with_target(true).with_thread_ids(true).init();
			} else {
				subscriber.init();
			}
		}
	}

	info!(
		"Logging configuration applied: level={}, format={:?}, structured={}",
		logging.level, logging.format, logging.structured
	);
}

/// Load `.env` and configuration, run one discovery pass and print the report as JSON
pub async fn run_from_env() -> Result<(), Box<dyn std::error::Error>> {
	dotenvy::dotenv().ok();

	let settings = load_config()?;
	init_tracing(&settings.logging);
	log_service_info();
	log_run_plan(&settings);

	let scanner = ScannerBuilder::new().with_settings(settings).build()?;

	for (provider_id, healthy) in scanner.health_check().await {
		if !healthy {
			warn!("Provider {} failed its health check", provider_id);
		}
	}

	let report = scanner.discover().await?;
	log_run_complete(&report.run_id, report.summary.matched_tokens, report.summary.quotes);
	println!("{}", serde_json::to_string_pretty(&report)?);

	log_service_shutdown();
	Ok(())
}
