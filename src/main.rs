//! xfee Scanner
//!
//! Runs one discovery pass with configuration from `config/config.*` and `XFEE_*` variables

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	xfee_scanner::run_from_env().await
}
