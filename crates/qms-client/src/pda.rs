//! Program-derived addresses used by every mint request.

use solana_sdk::pubkey::Pubkey;

pub const CONFIG_SEED: &[u8] = b"config";
pub const MINT_AUTHORITY_SEED: &[u8] = b"mint-authority";
pub const METADATA_SEED: &[u8] = b"metadata";

/// Derive the config account for a QMS program deployment.
pub fn config_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[CONFIG_SEED], program_id).0
}

/// Derive the PDA that acts as temporary mint authority during a mint.
pub fn mint_authority_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[MINT_AUTHORITY_SEED], program_id).0
}

/// Derive the metadata account for `mint`, owned by the token-metadata
/// program.
pub fn metadata_address(token_metadata_program: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            token_metadata_program.as_ref(),
            mint.as_ref(),
        ],
        token_metadata_program,
    )
    .0
}
