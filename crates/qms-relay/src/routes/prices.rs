use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::SharedState;

pub const PRICE_API_URL: &str = "https://api.coingecko.com/api/v3/simple/price";
pub const PRICE_CACHE_TTL: Duration = Duration::from_secs(60);

/// Short-lived cache of the last upstream answer, keyed by the
/// normalized id list.
#[derive(Debug, Default)]
pub struct PriceCache {
    key: String,
    fetched_at: Option<Instant>,
    data: Option<Value>,
}

impl PriceCache {
    pub fn get(&self, key: &str, ttl: Duration) -> Option<Value> {
        let fetched_at = self.fetched_at?;
        if self.key == key && fetched_at.elapsed() < ttl {
            self.data.clone()
        } else {
            None
        }
    }

    pub fn put(&mut self, key: String, data: Value) {
        self.key = key;
        self.fetched_at = Some(Instant::now());
        self.data = Some(data);
    }
}

#[derive(Debug, Deserialize)]
pub struct PricesQuery {
    ids: Option<String>,
}

fn normalize_ids(ids: &str) -> String {
    let unique: BTreeSet<&str> = ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();
    unique.into_iter().collect::<Vec<_>>().join(",")
}

/// Proxy the public price API, answering its JSON body unmodified.
pub async fn prices(
    State(state): State<SharedState>,
    Query(query): Query<PricesQuery>,
) -> Result<Json<Value>, ApiError> {
    let ids = query
        .ids
        .filter(|ids| !ids.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing ids."))?;
    let cache_key = normalize_ids(&ids);

    if let Some(cached) = state.prices.lock().await.get(&cache_key, PRICE_CACHE_TTL) {
        return Ok(Json(cached));
    }

    let response = state
        .http
        .get(PRICE_API_URL)
        .query(&[("ids", ids.as_str()), ("vs_currencies", "usd")])
        .send()
        .await
        .map_err(|err| {
            tracing::warn!(%err, "price lookup failed");
            ApiError::internal("Price lookup failed.")
        })?;
    if !response.status().is_success() {
        return Err(ApiError::bad_gateway("Price lookup failed."));
    }
    let data: Value = response
        .json()
        .await
        .map_err(|err| ApiError::internal(err.to_string()))?;

    state.prices.lock().await.put(cache_key, data.clone());
    Ok(Json(data))
}
