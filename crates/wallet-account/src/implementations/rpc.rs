//! JSON-RPC client for a chain node.
//!
//! Implements both [`AccessKeyLedger`] and [`AccountLookup`] on top of the
//! node's `query` method, always reading at `final` finality.

use crate::{AccessKeyLedger, AccountError, AccountLookup};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;
use wallet_types::{AccessKeyRecord, AccountId, NetworkConfig};

const UNKNOWN_ACCOUNT: &str = "UNKNOWN_ACCOUNT";

/// HTTP JSON-RPC client.
#[derive(Clone)]
pub struct RpcClient {
	client: reqwest::Client,
	node_url: Url,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
	#[serde(default)]
	result: Option<Value>,
	#[serde(default)]
	error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
	#[serde(default)]
	message: Option<String>,
	#[serde(default)]
	data: Option<Value>,
	#[serde(default)]
	cause: Option<ErrorCause>,
}

#[derive(Debug, Deserialize)]
struct ErrorCause {
	name: String,
}

#[derive(Debug, Deserialize)]
struct AccessKeyList {
	keys: Vec<AccessKeyRecord>,
}

enum QueryOutcome {
	Found(Value),
	UnknownAccount,
}

impl RpcClient {
	pub fn new(node_url: Url, timeout: Duration) -> Result<Self, AccountError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| AccountError::Transport(format!("Failed to create HTTP client: {}", e)))?;

		Ok(Self { client, node_url })
	}

	pub fn from_config(config: &NetworkConfig) -> Result<Self, AccountError> {
		Self::new(
			config.node_url.clone(),
			Duration::from_millis(config.timeout_ms),
		)
	}

	async fn query(&self, params: Value) -> Result<QueryOutcome, AccountError> {
		let body = json!({
			"jsonrpc": "2.0",
			"id": "dontcare",
			"method": "query",
			"params": params,
		});

		let response = self
			.client
			.post(self.node_url.clone())
			.json(&body)
			.send()
			.await
			.map_err(|e| AccountError::Transport(format!("HTTP request failed: {}", e)))?;

		if !response.status().is_success() {
			return Err(AccountError::Transport(format!(
				"HTTP request failed with status: {}",
				response.status()
			)));
		}

		let rpc_response: JsonRpcResponse = response
			.json()
			.await
			.map_err(|e| AccountError::InvalidResponse(format!("Failed to parse JSON: {}", e)))?;

		if let Some(error) = rpc_response.error {
			if error.cause.as_ref().map(|c| c.name.as_str()) == Some(UNKNOWN_ACCOUNT) {
				return Ok(QueryOutcome::UnknownAccount);
			}
			let detail = error
				.data
				.map(|d| d.to_string())
				.or(error.message)
				.unwrap_or_else(|| "unknown error".to_string());
			return Err(AccountError::Rpc(detail));
		}

		let result = rpc_response
			.result
			.ok_or_else(|| AccountError::InvalidResponse("Missing result".to_string()))?;

		// Older nodes report query failures inside the result object.
		if let Some(message) = result.get("error").and_then(|e| e.as_str()) {
			if message.contains("does not exist") {
				return Ok(QueryOutcome::UnknownAccount);
			}
			return Err(AccountError::Rpc(message.to_string()));
		}

		Ok(QueryOutcome::Found(result))
	}
}

#[async_trait]
impl AccessKeyLedger for RpcClient {
	async fn get_access_keys(
		&self,
		account_id: &AccountId,
	) -> Result<Vec<AccessKeyRecord>, AccountError> {
		debug!("Fetching access keys for {}", account_id);

		let outcome = self
			.query(json!({
				"request_type": "view_access_key_list",
				"finality": "final",
				"account_id": account_id,
			}))
			.await?;

		match outcome {
			QueryOutcome::Found(result) => {
				let list: AccessKeyList = serde_json::from_value(result).map_err(|e| {
					AccountError::InvalidResponse(format!("Invalid access key list: {}", e))
				})?;
				debug!("Account {} has {} access keys", account_id, list.keys.len());
				Ok(list.keys)
			}
			QueryOutcome::UnknownAccount => Err(AccountError::Rpc(format!(
				"Account {} does not exist",
				account_id
			))),
		}
	}
}

#[async_trait]
impl AccountLookup for RpcClient {
	async fn account_exists(&self, account_id: &AccountId) -> Result<bool, AccountError> {
		let outcome = self
			.query(json!({
				"request_type": "view_account",
				"finality": "final",
				"account_id": account_id,
			}))
			.await?;

		Ok(matches!(outcome, QueryOutcome::Found(_)))
	}
}
