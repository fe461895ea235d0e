use std::str::FromStr;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;

use crate::error::ApiError;
use crate::state::SharedState;

/// Request a 1 SOL airdrop for a devnet/testnet wallet. Other networks
/// are rejected before any RPC traffic.
pub async fn airdrop(
    State(state): State<SharedState>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let body = body.map(|Json(value)| value).unwrap_or(Value::Null);
    let address = body.get("address").and_then(Value::as_str).unwrap_or("");
    let network = body.get("network").and_then(Value::as_str).unwrap_or("");

    if address.is_empty() || network.is_empty() {
        return Err(ApiError::bad_request("Missing required fields."));
    }
    if network != "devnet" && network != "testnet" {
        return Err(ApiError::bad_request(
            "Airdrop is available only on devnet/testnet.",
        ));
    }
    let recipient = Pubkey::from_str(address)
        .map_err(|_| ApiError::bad_request("Invalid wallet address."))?;
    let endpoint = state
        .config
        .rpc_endpoint(network)
        .ok_or_else(|| ApiError::internal("RPC endpoint not configured."))?;

    let rpc = RpcClient::new(endpoint.to_string());
    let signature = rpc
        .request_airdrop(&recipient, LAMPORTS_PER_SOL)
        .await
        .map_err(|err| {
            tracing::warn!(%err, %recipient, "airdrop failed");
            ApiError::internal(err.to_string())
        })?;

    Ok(Json(json!({ "signature": signature.to_string() })))
}
