use std::env;

pub const DEFAULT_DEVNET_RPC: &str = "https://api.devnet.solana.com";
pub const DEFAULT_TESTNET_RPC: &str = "https://api.testnet.solana.com";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8787";

/// Relay configuration, read once at startup. Storage credentials are
/// optional; the presign endpoint answers 500 until they are set.
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    pub r2_account_id: Option<String>,
    pub r2_access_key_id: Option<String>,
    pub r2_secret_access_key: Option<String>,
    pub r2_bucket: Option<String>,
    pub r2_s3_endpoint: Option<String>,
    pub public_cdn_base_url: Option<String>,
    pub devnet_rpc: Option<String>,
    pub testnet_rpc: Option<String>,
    pub allowed_origins: Vec<String>,
    pub listen_addr: String,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self {
            r2_account_id: env_non_empty("R2_ACCOUNT_ID"),
            r2_access_key_id: env_non_empty("R2_ACCESS_KEY_ID"),
            r2_secret_access_key: env_non_empty("R2_SECRET_ACCESS_KEY"),
            r2_bucket: env_non_empty("R2_BUCKET"),
            r2_s3_endpoint: env_non_empty("R2_S3_ENDPOINT"),
            public_cdn_base_url: env_non_empty("PUBLIC_CDN_BASE_URL"),
            devnet_rpc: env_non_empty("DEVNET_RPC").or(Some(DEFAULT_DEVNET_RPC.to_string())),
            testnet_rpc: env_non_empty("TESTNET_RPC").or(Some(DEFAULT_TESTNET_RPC.to_string())),
            allowed_origins: env_non_empty("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            listen_addr: env_non_empty("RELAY_LISTEN_ADDR")
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        }
    }

    /// RPC endpoint for an airdrop-capable network, `None` otherwise.
    pub fn rpc_endpoint(&self, network: &str) -> Option<&str> {
        match network {
            "devnet" => self.devnet_rpc.as_deref(),
            "testnet" => self.testnet_rpc.as_deref(),
            _ => None,
        }
    }

    /// The S3 endpoint, derived from the account id when not set
    /// explicitly.
    pub fn s3_endpoint(&self) -> Option<String> {
        if let Some(endpoint) = &self.r2_s3_endpoint {
            return Some(endpoint.trim_end_matches('/').to_string());
        }
        self.r2_account_id
            .as_deref()
            .map(|account| format!("https://{account}.r2.cloudflarestorage.com"))
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_networks_have_no_endpoint() {
        let config = RelayConfig {
            devnet_rpc: Some(DEFAULT_DEVNET_RPC.to_string()),
            testnet_rpc: Some(DEFAULT_TESTNET_RPC.to_string()),
            ..RelayConfig::default()
        };
        assert!(config.rpc_endpoint("devnet").is_some());
        assert!(config.rpc_endpoint("testnet").is_some());
        assert_eq!(config.rpc_endpoint("mainnet"), None);
        assert_eq!(config.rpc_endpoint("mainnet-beta"), None);
    }

    #[test]
    fn s3_endpoint_falls_back_to_the_account_id() {
        let config = RelayConfig {
            r2_account_id: Some("acct".to_string()),
            ..RelayConfig::default()
        };
        assert_eq!(
            config.s3_endpoint().as_deref(),
            Some("https://acct.r2.cloudflarestorage.com")
        );

        let explicit = RelayConfig {
            r2_s3_endpoint: Some("https://s3.example/".to_string()),
            ..RelayConfig::default()
        };
        assert_eq!(explicit.s3_endpoint().as_deref(), Some("https://s3.example"));
    }
}
