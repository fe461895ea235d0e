//! Resolution of the three effective on-chain authorities.

use solana_sdk::pubkey::Pubkey;

use crate::config::parse_pubkey;
use crate::draft::{AuthorityMode, AuthorityType, MetadataMode, MintDraft, SupplyType};
use crate::error::QmsClientError;

/// Authorities as they will be applied by the program after the mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAuthorities {
    pub final_mint_authority: Option<Pubkey>,
    pub final_freeze_authority: Option<Pubkey>,
    pub update_authority: Pubkey,
    pub is_mutable: bool,
}

/// Compute the effective authorities for a draft.
///
/// A fixed supply always ends with a revoked mint authority, regardless
/// of the per-field flag. Freeze resolution re-runs the same delegate
/// lookup as mint resolution, so an advanced freeze delegate always
/// matches the mint delegate.
pub fn resolve_authorities(
    draft: &MintDraft,
    payer: Pubkey,
) -> Result<ResolvedAuthorities, QmsClientError> {
    let is_fixed = draft.token.supply_type == SupplyType::Fixed;
    let is_advanced = draft.authority.mode == AuthorityMode::Advanced;

    let resolve_delegate = || -> Result<Pubkey, QmsClientError> {
        if !is_advanced || draft.authority.authority_type == AuthorityType::Wallet {
            return Ok(payer);
        }
        if draft.authority.authority_address.is_empty() {
            return Err(QmsClientError::MissingAddress {
                label: "Authority address",
            });
        }
        parse_pubkey(&draft.authority.authority_address, "Authority address")
    };

    let final_mint_authority = if is_fixed || draft.authority.revoke_mint {
        None
    } else {
        Some(resolve_delegate()?)
    };

    let final_freeze_authority = if draft.authority.revoke_freeze {
        None
    } else {
        Some(resolve_delegate()?)
    };

    let update_authority = if draft.metadata.mode == MetadataMode::Onchain
        && draft.authority.update_authority
    {
        if draft.authority.update_authority_type == AuthorityType::Wallet {
            payer
        } else if draft.authority.update_authority_address.is_empty() {
            return Err(QmsClientError::MissingAddress {
                label: "Update authority address",
            });
        } else {
            parse_pubkey(
                &draft.authority.update_authority_address,
                "Update authority address",
            )?
        }
    } else {
        payer
    };

    Ok(ResolvedAuthorities {
        final_mint_authority,
        final_freeze_authority,
        update_authority,
        is_mutable: !is_fixed,
    })
}
