//! Best-effort pre-submission checks.
//!
//! Preflight warns, the hard gate in [`crate::draft`] blocks. The same
//! address checks feed both; preflight additionally compares the wallet
//! balance against a static fee estimate.

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;

use crate::draft::{is_valid_address, AuthorityMode, AuthorityType, MetadataMode, MintDraft};

/// Static fee estimate, in SOL: network base cost, QMS service fee, and
/// the surcharge for the bundled metadata instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeConfig {
    pub base_sol: f64,
    pub service_sol: f64,
    pub metadata_sol: f64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            base_sol: 0.01,
            service_sol: 0.004,
            metadata_sol: 0.002,
        }
    }
}

impl FeeConfig {
    pub fn total(&self, onchain_metadata: bool) -> f64 {
        let metadata = if onchain_metadata { self.metadata_sol } else { 0.0 };
        self.base_sol + self.service_sol + metadata
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreflightStatus {
    Success,
    Warning,
}

impl PreflightStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PreflightStatus::Success => "success",
            PreflightStatus::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preflight {
    pub status: PreflightStatus,
    pub issues: Vec<String>,
}

impl Preflight {
    pub fn from_issues(issues: Vec<String>) -> Self {
        let status = if issues.is_empty() {
            PreflightStatus::Success
        } else {
            PreflightStatus::Warning
        };
        Self { status, issues }
    }
}

/// The synchronous half of preflight: wallet presence and address shape.
pub fn collect_issues(draft: &MintDraft, wallet: Option<&Pubkey>) -> Vec<String> {
    let mut issues = Vec::new();
    if wallet.is_none() {
        issues.push("Wallet not connected".to_string());
    }
    if !is_valid_address(&draft.token.mint_to_address) {
        issues.push("Mint-to address is invalid".to_string());
    }
    if draft.authority.mode == AuthorityMode::Advanced
        && draft.authority.authority_type != AuthorityType::Wallet
        && !is_valid_address(&draft.authority.authority_address)
    {
        issues.push("Authority address is invalid".to_string());
    }
    if draft.metadata.mode == MetadataMode::Onchain
        && draft.authority.update_authority
        && draft.authority.update_authority_type != AuthorityType::Wallet
        && !is_valid_address(&draft.authority.update_authority_address)
    {
        issues.push("Update authority address is invalid".to_string());
    }
    issues
}

/// Full preflight pass. Balance-fetch failures degrade to an issue
/// string; they never fail the call.
pub async fn run(
    draft: &MintDraft,
    wallet: Option<&Pubkey>,
    rpc: &RpcClient,
    fees: &FeeConfig,
) -> Preflight {
    let mut issues = collect_issues(draft, wallet);

    if let Some(pubkey) = wallet {
        match rpc.get_balance(pubkey).await {
            Ok(lamports) => {
                let balance_sol = lamports as f64 / LAMPORTS_PER_SOL as f64;
                let estimate = fees.total(draft.metadata.mode == MetadataMode::Onchain);
                if balance_sol < estimate {
                    issues.push("Balance may be too low for estimated fees".to_string());
                }
            }
            Err(err) => {
                tracing::debug!(%err, "balance check failed");
                issues.push("Unable to check wallet balance".to_string());
            }
        }
    }

    Preflight::from_issues(issues)
}
