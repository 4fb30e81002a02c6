//! Startup and shutdown logging for the fee scanner

use std::env;
use tracing::info;

use crate::settings::Settings;

/// Logs service information at startup
pub fn log_service_info() {
	// Root package name, not this crate's
	let service_name = "xfee-scanner";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Cross-chain Fee Scanner Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	if let Ok(config_path) = env::var("XFEE_CONFIG_PATH") {
		info!("📋 Config Path: {}", config_path);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs what the discovery run is about to do; credentials are only described
pub fn log_run_plan(settings: &Settings) {
	let discovery = &settings.discovery;
	info!("🔗 Chains: {}", discovery.chains.join(" <-> "));
	info!(
		"💧 Min pool liquidity: {}, transfer size: ${}",
		discovery.min_liquidity, discovery.usd_amount
	);

	for (provider_id, provider) in settings.enabled_providers() {
		let credentials = provider
			.api_key
			.as_ref()
			.map(|key| key.description())
			.unwrap_or_else(|| "none".to_string());
		info!(
			"🌉 Provider {} ({}) priority {} at {}, api key: {}",
			provider_id, provider.provider_type, provider.priority, provider.endpoint, credentials
		);
	}

	if let Some(key) = &settings.prices.api_key {
		if key.is_plain_text() {
			tracing::warn!("Price API key is stored in plain text in the config file");
		}
	}
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("🛑 Cross-chain Fee Scanner Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs completion of a discovery run
pub fn log_run_complete(run_id: &str, matched_tokens: usize, quotes: usize) {
	info!("✅ Discovery {} complete", run_id);
	info!("📊 {} matched tokens, {} fee quotes", matched_tokens, quotes);
}
