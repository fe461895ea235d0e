use std::env;
use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use crate::error::QmsClientError;

pub const DEFAULT_TREASURY: &str = "7vs9qn7BMVfRX9APjDP6jTQmX18tK8h5mDugA1Lf47YH";
pub const DEFAULT_MAINNET_RPC: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_DEVNET_RPC: &str = "https://api.devnet.solana.com";
pub const DEFAULT_TESTNET_RPC: &str = "https://api.testnet.solana.com";
pub const DEFAULT_FEE_LAMPORTS: u64 = 14_000_000;

/// Cluster the client points at. Selects the RPC endpoint used for reads
/// and submission; the airdrop relay only serves devnet/testnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKey {
    Mainnet,
    Devnet,
    Testnet,
}

impl NetworkKey {
    pub fn label(self) -> &'static str {
        match self {
            NetworkKey::Mainnet => "Solana Mainnet",
            NetworkKey::Devnet => "Solana Devnet",
            NetworkKey::Testnet => "Solana Testnet",
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            NetworkKey::Mainnet => "mainnet-beta",
            NetworkKey::Devnet => "devnet",
            NetworkKey::Testnet => "testnet",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mainnet" | "mainnet-beta" => Some(NetworkKey::Mainnet),
            "devnet" => Some(NetworkKey::Devnet),
            "testnet" => Some(NetworkKey::Testnet),
            _ => None,
        }
    }
}

/// Environment-driven client configuration. Every field has a compiled-in
/// default except the program id, which must name a real deployment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub program_id: Option<String>,
    pub treasury: String,
    pub token_metadata_program: String,
    pub meta_api_base: Option<String>,
    pub rpc_mainnet: String,
    pub rpc_devnet: String,
    pub rpc_testnet: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program_id: None,
            treasury: DEFAULT_TREASURY.to_string(),
            token_metadata_program: mpl_token_metadata::ID.to_string(),
            meta_api_base: None,
            rpc_mainnet: DEFAULT_MAINNET_RPC.to_string(),
            rpc_devnet: DEFAULT_DEVNET_RPC.to_string(),
            rpc_testnet: DEFAULT_TESTNET_RPC.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            program_id: env_non_empty("QMS_PROGRAM_ID"),
            treasury: env_non_empty("QMS_TREASURY").unwrap_or(defaults.treasury),
            token_metadata_program: env_non_empty("TOKEN_METADATA_PROGRAM_ID")
                .unwrap_or(defaults.token_metadata_program),
            meta_api_base: env_non_empty("META_API_BASE"),
            rpc_mainnet: env_non_empty("SOLANA_MAINNET_RPC").unwrap_or(defaults.rpc_mainnet),
            rpc_devnet: env_non_empty("SOLANA_DEVNET_RPC").unwrap_or(defaults.rpc_devnet),
            rpc_testnet: env_non_empty("SOLANA_TESTNET_RPC").unwrap_or(defaults.rpc_testnet),
        }
    }

    pub fn rpc_endpoint(&self, network: NetworkKey) -> &str {
        match network {
            NetworkKey::Mainnet => &self.rpc_mainnet,
            NetworkKey::Devnet => &self.rpc_devnet,
            NetworkKey::Testnet => &self.rpc_testnet,
        }
    }
}

/// The three fixed addresses every mint request targets, parsed once up
/// front so malformed configuration fails before any network traffic.
#[derive(Debug, Clone, Copy)]
pub struct ProgramAddresses {
    pub program_id: Pubkey,
    pub treasury: Pubkey,
    pub token_metadata_program: Pubkey,
}

impl ProgramAddresses {
    pub fn resolve(config: &ClientConfig) -> Result<Self, QmsClientError> {
        let program_id = config
            .program_id
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or(QmsClientError::MissingProgramId)?;
        Ok(Self {
            program_id: parse_pubkey(program_id, "QMS program id")?,
            treasury: parse_pubkey(&config.treasury, "QMS treasury")?,
            token_metadata_program: parse_pubkey(
                &config.token_metadata_program,
                "Token metadata program id",
            )?,
        })
    }
}

pub fn parse_pubkey(value: &str, label: &'static str) -> Result<Pubkey, QmsClientError> {
    if value.is_empty() {
        return Err(QmsClientError::MissingAddress { label });
    }
    Pubkey::from_str(value).map_err(|_| QmsClientError::InvalidAddress { label })
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
