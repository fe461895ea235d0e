use anyhow::Result;

use qms_relay::{routes, AppState, RelayConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qms_relay=info".into()),
        )
        .init();

    let config = RelayConfig::from_env();
    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(config);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(%listen_addr, "qms relay listening");
    axum::serve(listener, app).await?;
    Ok(())
}
