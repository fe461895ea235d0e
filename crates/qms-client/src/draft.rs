//! The in-progress mint form and its wizard state machine.
//!
//! Mode switches carry side effects (a fixed supply forces the mint
//! authority to be revoked, off-chain metadata disables the update
//! authority). Those live in explicit transition functions here so the
//! allowed transitions are testable in isolation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_DESCRIPTION_LENGTH: usize = 280;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplyType {
    Fixed,
    Mintable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorityMode {
    Simple,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorityType {
    Wallet,
    Pda,
    Multisig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataMode {
    Offchain,
    Onchain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenSection {
    pub name: String,
    pub symbol: String,
    pub supply: String,
    pub decimals: u8,
    pub mint_to_address: String,
    pub supply_type: SupplyType,
}

impl Default for TokenSection {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            supply: String::new(),
            decimals: 9,
            mint_to_address: String::new(),
            supply_type: SupplyType::Fixed,
        }
    }
}

impl TokenSection {
    /// Name as submitted on-chain and into the metadata document.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            "QMS Token".to_string()
        } else {
            self.name.clone()
        }
    }

    /// Symbol as submitted, uppercased.
    pub fn display_symbol(&self) -> String {
        let symbol = if self.symbol.is_empty() { "QMS" } else { &self.symbol };
        symbol.to_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthoritySection {
    pub mode: AuthorityMode,
    pub revoke_mint: bool,
    pub revoke_freeze: bool,
    pub update_authority: bool,
    pub authority_type: AuthorityType,
    pub authority_address: String,
    pub update_authority_type: AuthorityType,
    pub update_authority_address: String,
}

impl Default for AuthoritySection {
    fn default() -> Self {
        Self {
            mode: AuthorityMode::Simple,
            revoke_mint: true,
            revoke_freeze: true,
            update_authority: false,
            authority_type: AuthorityType::Wallet,
            authority_address: String::new(),
            update_authority_type: AuthorityType::Wallet,
            update_authority_address: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataSection {
    pub mode: MetadataMode,
    pub logo_data_url: String,
    pub logo_file_name: String,
    pub crop_to_square: bool,
    pub description: String,
    pub website: String,
    pub twitter: String,
    pub discord: String,
}

impl Default for MetadataSection {
    fn default() -> Self {
        Self {
            mode: MetadataMode::Offchain,
            logo_data_url: String::new(),
            logo_file_name: String::new(),
            crop_to_square: true,
            description: String::new(),
            website: String::new(),
            twitter: String::new(),
            discord: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfirmationsSection {
    pub revoke_mint_acknowledged: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MintDraft {
    pub token: TokenSection,
    pub authority: AuthoritySection,
    pub metadata: MetadataSection,
    pub confirmations: ConfirmationsSection,
}

/// The four sequential wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    TokenInfo,
    Authority,
    Metadata,
    Review,
}

impl WizardStep {
    pub fn index(self) -> u8 {
        match self {
            WizardStep::TokenInfo => 1,
            WizardStep::Authority => 2,
            WizardStep::Metadata => 3,
            WizardStep::Review => 4,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(WizardStep::TokenInfo),
            2 => Some(WizardStep::Authority),
            3 => Some(WizardStep::Metadata),
            4 => Some(WizardStep::Review),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn back(self) -> Option<Self> {
        Self::from_index(self.index().wrapping_sub(1))
    }
}

impl MintDraft {
    /// Switch between fixed and mintable supply. A fixed supply always
    /// forces the mint authority to be revoked; flipping back to mintable
    /// only re-enables it in simple mode, where the flag mirrors the
    /// supply type.
    pub fn set_supply_type(&mut self, next: SupplyType) {
        if self.token.supply_type == next {
            return;
        }
        self.token.supply_type = next;
        match next {
            SupplyType::Fixed => self.authority.revoke_mint = true,
            SupplyType::Mintable => {
                if self.authority.mode == AuthorityMode::Simple {
                    self.authority.revoke_mint = false;
                }
            }
        }
    }

    pub fn set_authority_mode(&mut self, next: AuthorityMode) {
        self.authority.mode = next;
        if next == AuthorityMode::Simple {
            self.authority.revoke_mint = self.token.supply_type == SupplyType::Fixed;
            self.reset_update_authority();
        }
    }

    /// Off-chain metadata has no update authority; switching away from
    /// on-chain resets those fields.
    pub fn set_metadata_mode(&mut self, next: MetadataMode) {
        self.metadata.mode = next;
        if next == MetadataMode::Offchain {
            self.reset_update_authority();
        }
    }

    fn reset_update_authority(&mut self) {
        self.authority.update_authority = false;
        self.authority.update_authority_type = AuthorityType::Wallet;
        self.authority.update_authority_address.clear();
    }

    /// Whether the review step must collect the revoke acknowledgement.
    pub fn requires_revoke_ack(&self) -> bool {
        self.token.supply_type == SupplyType::Fixed || self.authority.revoke_mint
    }

    /// The hard submission gate: unlike preflight this blocks the mint
    /// button outright.
    pub fn has_hard_errors(&self, wallet_connected: bool) -> bool {
        if !wallet_connected {
            return true;
        }
        if !is_valid_address(&self.token.mint_to_address) {
            return true;
        }
        if self.authority.mode == AuthorityMode::Advanced
            && self.authority.authority_type != AuthorityType::Wallet
            && !is_valid_address(&self.authority.authority_address)
        {
            return true;
        }
        if self.metadata.mode == MetadataMode::Onchain
            && self.authority.update_authority
            && self.authority.update_authority_type != AuthorityType::Wallet
            && !is_valid_address(&self.authority.update_authority_address)
        {
            return true;
        }
        false
    }
}

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepValidation {
    pub errors: Vec<FieldIssue>,
}

impl StepValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldIssue {
            field,
            message: message.into(),
        });
    }
}

pub fn is_valid_address(value: &str) -> bool {
    Pubkey::from_str(value.trim()).is_ok()
}

pub fn is_valid_https_url(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    if !value.starts_with("https://") {
        return false;
    }
    url::Url::parse(value).is_ok()
}

/// Validate the fields belonging to one wizard step.
pub fn validate_step(step: WizardStep, draft: &MintDraft) -> StepValidation {
    let mut validation = StepValidation::default();
    let token = &draft.token;
    let authority = &draft.authority;
    let metadata = &draft.metadata;

    match step {
        WizardStep::TokenInfo => {
            if token.name.trim().is_empty() {
                validation.push("name", "Token name is required.");
            }
            if token.symbol.trim().is_empty() {
                validation.push("symbol", "Symbol is required.");
            } else if token.symbol.len() > MAX_SYMBOL_LENGTH {
                validation.push("symbol", format!("Max {MAX_SYMBOL_LENGTH} characters."));
            }
            if token.mint_to_address.trim().is_empty() {
                validation.push("mintToAddress", "Mint address is required.");
            } else if !is_valid_address(&token.mint_to_address) {
                validation.push("mintToAddress", "Invalid Solana address.");
            }
            let supply_positive = token
                .supply
                .replace(',', "")
                .trim()
                .parse::<f64>()
                .map(|value| value > 0.0)
                .unwrap_or(true);
            if token.supply.trim().is_empty() || !supply_positive {
                validation.push("supply", "Supply must be greater than 0.");
            }
        }
        WizardStep::Authority => {
            if authority.mode == AuthorityMode::Advanced {
                if authority.authority_type != AuthorityType::Wallet
                    && !is_valid_address(&authority.authority_address)
                {
                    validation.push("authorityAddress", "Authority address is required.");
                }
                if metadata.mode == MetadataMode::Onchain
                    && authority.update_authority
                    && authority.update_authority_type != AuthorityType::Wallet
                    && !is_valid_address(&authority.update_authority_address)
                {
                    validation.push(
                        "updateAuthorityAddress",
                        "Update authority address is required.",
                    );
                }
            }
        }
        WizardStep::Metadata => {
            if metadata.description.len() > MAX_DESCRIPTION_LENGTH {
                validation.push(
                    "description",
                    format!("Max {MAX_DESCRIPTION_LENGTH} characters."),
                );
            }
            if !is_valid_https_url(&metadata.website) {
                validation.push("website", "Website must start with https://");
            }
            if !is_valid_https_url(&metadata.twitter) {
                validation.push("twitter", "Twitter URL must start with https://");
            }
            if !is_valid_https_url(&metadata.discord) {
                validation.push("discord", "Discord URL must start with https://");
            }
        }
        WizardStep::Review => {}
    }

    validation
}
