//! Main entry point for the orders API service.
//!
//! This binary loads the configuration, builds the configured order store and
//! serves the orders resource over HTTP until interrupted.

use clap::Parser;
use orders_config::Config;
use orders_core::OrderService;
use orders_storage::OrderStore;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

/// Command-line arguments for the orders service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config = load_config(&args.config).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let store = build_store(&config)?;
	let orders = Arc::new(OrderService::new(store));

	server::start_server(config.api.clone(), orders).await?;

	tracing::info!("Stopped orders API");
	Ok(())
}

/// Reads the config file, falling back to defaults when it does not exist.
async fn load_config(path: &std::path::Path) -> Result<Config, Box<dyn std::error::Error>> {
	if !path.exists() {
		tracing::warn!(
			"Configuration file {} not found, using defaults",
			path.display()
		);
		return Ok(Config::default());
	}
	let path = path
		.to_str()
		.ok_or_else(|| format!("Configuration path is not valid UTF-8: {}", path.display()))?;
	Ok(Config::from_file(path).await?)
}

/// Builds the primary store named in the configuration.
fn build_store(config: &Config) -> Result<Arc<dyn OrderStore>, Box<dyn std::error::Error>> {
	let primary = &config.storage.primary;
	let store_config = config
		.storage
		.primary_config()
		.cloned()
		.unwrap_or_else(|| toml::Value::Table(toml::map::Map::new()));

	let store = orders_storage::create_store(primary, &store_config)?;
	tracing::info!("Using {} order store", primary);
	Ok(Arc::from(store))
}
