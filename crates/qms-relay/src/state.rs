use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::RelayConfig;
use crate::routes::prices::PriceCache;
use crate::storage::Presigner;

/// Shared handles for every request. The price cache is the only
/// mutable piece and sits behind its own lock.
pub struct AppState {
    pub config: RelayConfig,
    pub storage: Option<Presigner>,
    pub http: reqwest::Client,
    pub prices: Mutex<PriceCache>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: RelayConfig) -> SharedState {
        let storage = Presigner::from_config(&config);
        if storage.is_none() {
            tracing::warn!("storage credentials missing; presign endpoint will fail until configured");
        }
        Arc::new(Self {
            config,
            storage,
            http: reqwest::Client::new(),
            prices: Mutex::new(PriceCache::default()),
        })
    }
}
