//! Command-line interface definitions.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use url::Url;
use wallet_core::SignInOptions;
use wallet_types::{Action, Balance, Gas, SignTransactionOptions, TransactionRequest};

const DEFAULT_GAS: Gas = 30_000_000_000_000;

#[derive(Parser, Debug)]
#[command(name = "wallet-cli")]
#[command(about = "Redirect wallet connection", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
	/// Path to configuration file
	#[arg(short, long, env = "WALLET_CONFIG_FILE", default_value = "config/wallet.toml")]
	pub config: PathBuf,

	/// Log level override (trace, debug, info, warn, error)
	#[arg(short, long, env = "WALLET_LOG_LEVEL")]
	pub log_level: Option<String>,

	/// URL of the page the wallet is used from. Pass the wallet's callback
	/// URL here to resume a redirect.
	#[arg(short, long, default_value = "http://localhost:3000/")]
	pub page_url: Url,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Redirect to the wallet's login page
	SignIn(SignInArgs),

	/// Resolve the wallet callback in --page-url
	Complete,

	/// Show the signed-in account
	Status,

	/// Forget the signed-in account
	SignOut,

	/// Redirect to the wallet to sign a transaction
	SignTransaction(SignTransactionArgs),

	/// Validate the configuration file
	Validate,
}

#[derive(ClapArgs, Debug)]
pub struct SignInArgs {
	/// Contract the requested access key is limited to
	#[arg(long)]
	pub contract: Option<String>,

	/// Method the access key may call; repeat for several
	#[arg(long = "method")]
	pub methods: Vec<String>,

	#[arg(long)]
	pub success_url: Option<String>,

	#[arg(long)]
	pub failure_url: Option<String>,
}

impl SignInArgs {
	pub fn to_options(&self) -> SignInOptions {
		let mut options = SignInOptions::new().with_method_names(self.methods.iter().cloned());
		if let Some(contract) = &self.contract {
			options = options.with_contract(contract.as_str());
		}
		if let Some(url) = &self.success_url {
			options = options.with_success_url(url.clone());
		}
		if let Some(url) = &self.failure_url {
			options = options.with_failure_url(url.clone());
		}
		options
	}
}

#[derive(ClapArgs, Debug)]
pub struct SignTransactionArgs {
	/// Receiver of the transaction
	#[arg(long)]
	pub receiver: String,

	/// Function to call. Without it the transaction is a plain transfer.
	#[arg(long)]
	pub method: Option<String>,

	/// JSON arguments of the function call
	#[arg(long, default_value = "{}")]
	pub args: String,

	#[arg(long, default_value_t = DEFAULT_GAS)]
	pub gas: Gas,

	/// Attached deposit in yoctoNEAR
	#[arg(long, default_value_t = 0)]
	pub deposit: Balance,

	/// Opaque value the wallet echoes back on the callback
	#[arg(long)]
	pub meta: Option<String>,

	#[arg(long)]
	pub callback_url: Option<String>,
}

impl SignTransactionArgs {
	pub fn to_options(&self) -> SignTransactionOptions {
		let action = match &self.method {
			Some(method) => Action::function_call(
				method.as_str(),
				self.args.as_bytes().to_vec(),
				self.gas,
				self.deposit,
			),
			None => Action::transfer(self.deposit),
		};

		let mut options =
			SignTransactionOptions::new(TransactionRequest::new(self.receiver.as_str(), vec![action]));
		if let Some(meta) = &self.meta {
			options = options.with_meta(meta.clone());
		}
		if let Some(url) = &self.callback_url {
			options = options.with_callback_url(url.clone());
		}
		options
	}
}
