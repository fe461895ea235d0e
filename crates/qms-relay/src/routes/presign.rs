use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::SharedState;
use crate::storage::{UploadKind, ALLOWED_LOGO_TYPES};

/// Validate an upload request and answer with a time-boxed PUT grant.
///
/// Validation runs before the storage-configuration check so clients get
/// field feedback even on an unconfigured deployment.
pub async fn presign(
    State(state): State<SharedState>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let body = body.map(|Json(value)| value).unwrap_or(Value::Null);
    let mint = body.get("mint").and_then(Value::as_str).unwrap_or("");
    let kind_raw = body.get("kind").and_then(Value::as_str).unwrap_or("");
    let content_type = body.get("contentType").and_then(Value::as_str).unwrap_or("");

    if mint.is_empty() || kind_raw.is_empty() || content_type.is_empty() {
        return Err(ApiError::bad_request("Missing required fields."));
    }
    let kind =
        UploadKind::parse(kind_raw).ok_or_else(|| ApiError::bad_request("Invalid kind."))?;
    match kind {
        UploadKind::Logo if !ALLOWED_LOGO_TYPES.contains(&content_type) => {
            return Err(ApiError::bad_request("Unsupported logo content type."));
        }
        UploadKind::Json if content_type != "application/json" => {
            return Err(ApiError::bad_request("Invalid JSON content type."));
        }
        _ => {}
    }
    if let Some(length) = body.get("contentLength").and_then(Value::as_u64) {
        if length > kind.max_bytes() {
            return Err(ApiError::bad_request("File too large."));
        }
    }

    let presigner = state
        .storage
        .as_ref()
        .ok_or_else(|| ApiError::internal("R2 not configured."))?;
    let key = kind.object_key(mint, content_type);
    let (upload_url, public_url) = presigner.presign_put(&key, content_type);
    tracing::debug!(%key, "presigned upload grant issued");

    Ok(Json(json!({ "uploadUrl": upload_url, "publicUrl": public_url })))
}
