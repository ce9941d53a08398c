use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use wallet_config::ConfigLoader;
use wallet_core::{MemoryEnvironment, RedirectWallet, SessionEnvironment, WalletBuilder};
use wallet_types::{LoggingConfig, StorageBackend, WalletConfig};

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let config = ConfigLoader::new()
		.with_file(&args.config)
		.load()
		.await
		.with_context(|| format!("Failed to load configuration from {:?}", args.config))?;

	setup_tracing(&config.logging, args.log_level.as_deref())?;

	if let Command::Validate = args.command {
		return validate_config(&args, &config);
	}

	run_wallet_command(&args, config).await
}

async fn run_wallet_command(args: &Args, config: WalletConfig) -> Result<()> {
	if config.storage.backend == StorageBackend::Memory {
		warn!("Memory storage is configured; session state will not outlive this command");
	}

	let environment = Arc::new(MemoryEnvironment::new(args.page_url.clone()));

	// Building the wallet already resolves a callback in the page URL.
	let mut wallet = WalletBuilder::new()
		.with_config(config)
		.with_environment(environment.clone())
		.build()
		.await
		.context("Failed to connect wallet")?;

	match &args.command {
		Command::SignIn(sign_in) => {
			wallet
				.request_sign_in(sign_in.to_options())
				.await
				.context("Failed to start sign-in")?;
		}
		Command::Complete => {
			// A stored session skips the completion done while building.
			wallet
				.complete_sign_in()
				.await
				.context("Failed to complete sign-in")?;
			print_status(&wallet);
		}
		Command::Status => print_status(&wallet),
		Command::SignOut => {
			let account_id = wallet.get_account_id();
			if wallet.sign_out().await && !account_id.is_empty() {
				println!("Signed out {}", account_id);
			} else {
				println!("Not signed in");
			}
		}
		Command::SignTransaction(sign) => {
			wallet
				.request_sign_transaction(sign.to_options())
				.await
				.context("Failed to request transaction signature")?;
		}
		Command::Validate => {}
	}

	for url in environment.navigations() {
		println!("Redirect to: {}", url);
	}
	if environment.replacements() > 0 {
		println!("Page URL: {}", environment.current_url());
	}

	Ok(())
}

fn print_status(wallet: &RedirectWallet) {
	if !wallet.is_signed_in() {
		println!("Not signed in");
		return;
	}

	println!("Signed in as {}", wallet.get_account_id());
	for key in &wallet.session().identity().all_keys {
		println!("  {}", key);
	}
}

fn validate_config(args: &Args, config: &WalletConfig) -> Result<()> {
	info!("Validating configuration file: {:?}", args.config);

	println!("Configuration is valid");
	println!("Network: {}", config.network.network_id);
	println!("Node URL: {}", config.network.node_url);
	println!("Wallet URL: {}", config.network.wallet_url);
	println!("Key prefix: {}", config.app.resolved_key_prefix());
	println!("Storage backend: {:?}", config.storage.backend);

	Ok(())
}

fn setup_tracing(logging: &LoggingConfig, level_override: Option<&str>) -> Result<()> {
	let level = level_override.unwrap_or(&logging.level);
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

	let fmt_layer = if logging.json {
		tracing_subscriber::fmt::layer()
			.json()
			.with_writer(std::io::stderr)
			.boxed()
	} else {
		tracing_subscriber::fmt::layer()
			.with_writer(std::io::stderr)
			.boxed()
	};

	tracing_subscriber::registry()
		.with(env_filter)
		.with(fmt_layer)
		.try_init()
		.context("Failed to initialize tracing")?;

	Ok(())
}
