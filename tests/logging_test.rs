//! Tracing initialization from logging settings

use xfee_scanner::config::{LogFormat, LoggingSettings};
use xfee_scanner::init_tracing;

// Installs the process-wide subscriber, so this binary holds a single test
#[test]
fn test_init_tracing_installs_global_subscriber() {
	let logging = LoggingSettings {
		level: "debug".to_string(),
		format: LogFormat::Compact,
		structured: true,
	};

	init_tracing(&logging);

	assert!(tracing::dispatcher::has_been_set());
	tracing::info!("subscriber installed");
}
