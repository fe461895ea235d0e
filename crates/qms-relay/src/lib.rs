//! Backend glue for the QMS mint front-end: presigned-upload grants,
//! a devnet/testnet faucet proxy, and a price-lookup proxy.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;

pub use config::RelayConfig;
pub use state::{AppState, SharedState};
