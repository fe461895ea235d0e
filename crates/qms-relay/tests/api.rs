//! In-process handler tests: each request goes through the full router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use qms_relay::{routes, AppState, RelayConfig};

fn base_config() -> RelayConfig {
    RelayConfig {
        devnet_rpc: Some("https://api.devnet.solana.com".to_string()),
        testnet_rpc: Some("https://api.testnet.solana.com".to_string()),
        listen_addr: "127.0.0.1:0".to_string(),
        ..RelayConfig::default()
    }
}

fn unconfigured_router() -> Router {
    routes::router(AppState::new(base_config()))
}

fn configured_router() -> Router {
    let config = RelayConfig {
        r2_account_id: Some("acct".to_string()),
        r2_access_key_id: Some("key".to_string()),
        r2_secret_access_key: Some("secret".to_string()),
        r2_bucket: Some("qms-meta".to_string()),
        public_cdn_base_url: Some("https://cdn.example".to_string()),
        ..base_config()
    };
    routes::router(AppState::new(config))
}

async fn post_json(router: Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(router, request).await
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn presign_requires_all_fields() {
    let (status, body) = post_json(
        unconfigured_router(),
        "/api/meta/presign",
        json!({ "mint": "Mint", "kind": "logo" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields.");
}

#[tokio::test]
async fn presign_handles_an_empty_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/meta/presign")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(unconfigured_router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields.");
}

#[tokio::test]
async fn presign_rejects_unknown_kinds() {
    let (status, body) = post_json(
        unconfigured_router(),
        "/api/meta/presign",
        json!({ "mint": "Mint", "kind": "video", "contentType": "video/mp4" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid kind.");
}

#[tokio::test]
async fn presign_rejects_logo_content_types_off_the_allow_list() {
    let (status, body) = post_json(
        unconfigured_router(),
        "/api/meta/presign",
        json!({ "mint": "Mint", "kind": "logo", "contentType": "image/gif" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported logo content type.");
}

#[tokio::test]
async fn presign_rejects_non_json_metadata_uploads() {
    let (status, body) = post_json(
        unconfigured_router(),
        "/api/meta/presign",
        json!({ "mint": "Mint", "kind": "json", "contentType": "text/plain" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON content type.");
}

#[tokio::test]
async fn presign_rejects_oversized_logos() {
    let (status, body) = post_json(
        unconfigured_router(),
        "/api/meta/presign",
        json!({
            "mint": "Mint",
            "kind": "logo",
            "contentType": "image/png",
            "contentLength": 2 * 1024 * 1024 + 1
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "File too large.");
}

#[tokio::test]
async fn presign_rejects_oversized_json_documents() {
    let (status, body) = post_json(
        unconfigured_router(),
        "/api/meta/presign",
        json!({
            "mint": "Mint",
            "kind": "json",
            "contentType": "application/json",
            "contentLength": 50 * 1024 + 1
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "File too large.");
}

#[tokio::test]
async fn presign_without_storage_is_a_server_error() {
    let (status, body) = post_json(
        unconfigured_router(),
        "/api/meta/presign",
        json!({ "mint": "Mint", "kind": "logo", "contentType": "image/png" }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "R2 not configured.");
}

#[tokio::test]
async fn presign_grants_a_signed_put_and_public_url() {
    let (status, body) = post_json(
        configured_router(),
        "/api/meta/presign",
        json!({
            "mint": "MintAddr",
            "kind": "logo",
            "contentType": "image/webp",
            "contentLength": 1024
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let upload_url = body["uploadUrl"].as_str().unwrap();
    assert!(upload_url.contains("logos/MintAddr.webp"));
    assert!(upload_url.contains("X-Amz-Signature="));
    assert_eq!(body["publicUrl"], "https://cdn.example/logos/MintAddr.webp");
}

#[tokio::test]
async fn presign_ignores_a_non_numeric_content_length() {
    let (status, _) = post_json(
        configured_router(),
        "/api/meta/presign",
        json!({
            "mint": "MintAddr",
            "kind": "json",
            "contentType": "application/json",
            "contentLength": "huge"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn airdrop_requires_address_and_network() {
    let (status, body) = post_json(
        unconfigured_router(),
        "/api/airdrop",
        json!({ "address": "SomeAddress" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields.");
}

#[tokio::test]
async fn airdrop_rejects_mainnet_without_touching_rpc() {
    // The unconfigured router has no reachable RPC; a 400 here proves the
    // request never left the handler.
    let (status, body) = post_json(
        unconfigured_router(),
        "/api/airdrop",
        json!({ "address": "SomeAddress", "network": "mainnet" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Airdrop is available only on devnet/testnet.");
}

#[tokio::test]
async fn airdrop_rejects_malformed_addresses() {
    let (status, body) = post_json(
        unconfigured_router(),
        "/api/airdrop",
        json!({ "address": "!!definitely-not-base58!!", "network": "devnet" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid wallet address.");
}

#[tokio::test]
async fn prices_require_ids() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/prices")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(unconfigured_router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing ids.");
}

#[tokio::test]
async fn prices_reject_an_empty_ids_list() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/prices?ids=")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(unconfigured_router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing ids.");
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/unknown")
        .body(Body::empty())
        .unwrap();
    let response = unconfigured_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
