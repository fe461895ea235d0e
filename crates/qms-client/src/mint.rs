//! Composition and submission of mint requests.
//!
//! Every attempt generates a fresh mint keypair, derives the program
//! accounts for it, resolves authorities, and — when on-chain metadata
//! is requested — uploads both assets before a single transaction is
//! composed. Nothing reaches the chain unless every prior step
//! succeeded.

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::compute_budget::ComputeBudgetInstruction;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::system_program;
use solana_sdk::sysvar;
use solana_sdk::transaction::Transaction;
use spl_associated_token_account::get_associated_token_address;

use crate::amount::parse_amount_to_base_units;
use crate::authority::{resolve_authorities, ResolvedAuthorities};
use crate::config::{parse_pubkey, ClientConfig, ProgramAddresses};
use crate::draft::{MetadataMode, MintDraft};
use crate::error::QmsClientError;
use crate::metadata::MetadataUploader;
use crate::pda;

/// Compute-budget overrides for the bundled metadata variant, which
/// exceeds the default compute limit.
pub const COMPUTE_UNIT_LIMIT: u32 = 400_000;
pub const COMPUTE_UNIT_PRICE_MICRO_LAMPORTS: u64 = 1_000;

/// Instruction arguments, matching the program ABI field for field.
#[derive(Debug, Clone, BorshSerialize)]
pub struct MintTokenArgs {
    pub decimals: u8,
    pub initial_supply: u64,
    pub mint_to: Pubkey,
    pub final_mint_authority: Option<Pubkey>,
    pub final_freeze_authority: Option<Pubkey>,
    pub client_ref: Option<[u8; 16]>,
}

#[derive(Debug, Clone, BorshSerialize)]
pub struct MetadataArgs {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub is_mutable: bool,
    pub update_authority: Pubkey,
}

/// Accounts shared by both mint instruction shapes, in program order.
#[derive(Debug, Clone, Copy)]
pub struct MintAccounts {
    pub payer: Pubkey,
    pub config: Pubkey,
    pub treasury: Pubkey,
    pub mint: Pubkey,
    pub program_authority: Pubkey,
    pub destination_owner: Pubkey,
    pub destination_ata: Pubkey,
}

#[derive(Debug, Clone, Copy)]
pub struct MetadataAccounts {
    pub metadata_pda: Pubkey,
    pub update_authority: Pubkey,
    pub token_metadata_program: Pubkey,
}

/// Everything the caller needs to sign and submit.
#[derive(Debug)]
pub struct PreparedMint {
    pub instructions: Vec<Instruction>,
    pub destination_ata: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub metadata_uri: Option<String>,
}

/// Shared handles for a mint attempt. `payer` is `None` while no wallet
/// is connected; `client_ref` tags the emitted mint event.
pub struct MintContext<'a> {
    pub rpc: &'a RpcClient,
    pub payer: Option<&'a Keypair>,
    pub config: &'a ClientConfig,
    pub http: &'a reqwest::Client,
    pub client_ref: Option<[u8; 16]>,
}

fn anchor_discriminator(name: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(b"global:");
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&digest[..8]);
    discriminator
}

/// The plain mint instruction.
pub fn mint_token_instruction(
    program_id: &Pubkey,
    accounts: &MintAccounts,
    args: &MintTokenArgs,
) -> Result<Instruction, QmsClientError> {
    let mut data = anchor_discriminator("mint_token").to_vec();
    data.extend(borsh::to_vec(args)?);
    Ok(Instruction {
        program_id: *program_id,
        accounts: shared_account_metas(accounts)
            .chain(program_account_metas())
            .collect(),
        data,
    })
}

/// The mint instruction bundled with an atomic metadata write.
pub fn mint_token_with_metadata_instruction(
    program_id: &Pubkey,
    accounts: &MintAccounts,
    metadata: &MetadataAccounts,
    args: &MintTokenArgs,
    meta_args: &MetadataArgs,
) -> Result<Instruction, QmsClientError> {
    let mut data = anchor_discriminator("mint_token_with_metadata").to_vec();
    data.extend(borsh::to_vec(args)?);
    data.extend(borsh::to_vec(meta_args)?);
    let metadata_metas = [
        AccountMeta::new(metadata.metadata_pda, false),
        AccountMeta::new_readonly(metadata.update_authority, false),
        AccountMeta::new_readonly(metadata.token_metadata_program, false),
    ];
    Ok(Instruction {
        program_id: *program_id,
        accounts: shared_account_metas(accounts)
            .chain(metadata_metas)
            .chain(program_account_metas())
            .collect(),
        data,
    })
}

fn shared_account_metas(accounts: &MintAccounts) -> impl Iterator<Item = AccountMeta> {
    [
        AccountMeta::new(accounts.payer, true),
        AccountMeta::new_readonly(accounts.config, false),
        AccountMeta::new(accounts.treasury, false),
        AccountMeta::new(accounts.mint, true),
        AccountMeta::new_readonly(accounts.program_authority, false),
        AccountMeta::new_readonly(accounts.destination_owner, false),
        AccountMeta::new(accounts.destination_ata, false),
    ]
    .into_iter()
}

fn program_account_metas() -> impl Iterator<Item = AccountMeta> {
    [
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(spl_associated_token_account::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
    ]
    .into_iter()
}

/// The admin instruction that seeds the config PDA.
pub fn initialize_config_instruction(
    program_id: &Pubkey,
    admin: &Pubkey,
    treasury: &Pubkey,
    fee_lamports: u64,
) -> Result<Instruction, QmsClientError> {
    let mut data = anchor_discriminator("initialize_config").to_vec();
    data.extend(borsh::to_vec(treasury)?);
    data.extend(borsh::to_vec(&fee_lamports)?);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(pda::config_address(program_id), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}

fn resolve_mint_to(draft: &MintDraft, payer: Pubkey) -> Result<Pubkey, QmsClientError> {
    let address = draft.token.mint_to_address.trim();
    if address.is_empty() {
        Ok(payer)
    } else {
        parse_pubkey(address, "Mint-to address")
    }
}

fn base_unit_supply(draft: &MintDraft) -> Result<u64, QmsClientError> {
    let supply = parse_amount_to_base_units(&draft.token.supply, draft.token.decimals);
    u64::try_from(supply).map_err(|_| QmsClientError::SupplyOutOfRange)
}

/// Compose the full instruction list for a draft, without touching the
/// network. `metadata_uri` must already be uploaded for on-chain drafts.
pub fn prepare_mint(
    draft: &MintDraft,
    config: &ClientConfig,
    payer: Pubkey,
    mint: Pubkey,
    metadata_uri: Option<&str>,
    client_ref: Option<[u8; 16]>,
) -> Result<PreparedMint, QmsClientError> {
    let program = ProgramAddresses::resolve(config)?;
    let authorities = resolve_authorities(draft, payer)?;
    compose(draft, &program, &authorities, payer, mint, metadata_uri, client_ref)
}

fn compose(
    draft: &MintDraft,
    program: &ProgramAddresses,
    authorities: &ResolvedAuthorities,
    payer: Pubkey,
    mint: Pubkey,
    metadata_uri: Option<&str>,
    client_ref: Option<[u8; 16]>,
) -> Result<PreparedMint, QmsClientError> {
    let mint_to = resolve_mint_to(draft, payer)?;
    let destination_ata = get_associated_token_address(&mint_to, &mint);

    let accounts = MintAccounts {
        payer,
        config: pda::config_address(&program.program_id),
        treasury: program.treasury,
        mint,
        program_authority: pda::mint_authority_address(&program.program_id),
        destination_owner: mint_to,
        destination_ata,
    };

    let args = MintTokenArgs {
        decimals: draft.token.decimals,
        initial_supply: base_unit_supply(draft)?,
        mint_to,
        final_mint_authority: authorities.final_mint_authority,
        final_freeze_authority: authorities.final_freeze_authority,
        client_ref,
    };

    let instructions = if draft.metadata.mode == MetadataMode::Onchain {
        let metadata = MetadataAccounts {
            metadata_pda: pda::metadata_address(&program.token_metadata_program, &mint),
            update_authority: authorities.update_authority,
            token_metadata_program: program.token_metadata_program,
        };
        let meta_args = MetadataArgs {
            name: draft.token.display_name(),
            symbol: draft.token.display_symbol(),
            uri: metadata_uri.unwrap_or_default().to_string(),
            seller_fee_basis_points: 0,
            is_mutable: authorities.is_mutable,
            update_authority: authorities.update_authority,
        };
        vec![
            ComputeBudgetInstruction::set_compute_unit_limit(COMPUTE_UNIT_LIMIT),
            ComputeBudgetInstruction::set_compute_unit_price(COMPUTE_UNIT_PRICE_MICRO_LAMPORTS),
            mint_token_with_metadata_instruction(
                &program.program_id,
                &accounts,
                &metadata,
                &args,
                &meta_args,
            )?,
        ]
    } else {
        vec![mint_token_instruction(&program.program_id, &accounts, &args)?]
    };

    Ok(PreparedMint {
        instructions,
        destination_ata,
    })
}

/// Run the whole pipeline: validate, upload, compose, sign, submit.
pub async fn mint_token(
    draft: &MintDraft,
    ctx: &MintContext<'_>,
) -> Result<MintReceipt, QmsClientError> {
    let payer_keypair = ctx.payer.ok_or(QmsClientError::WalletNotConnected)?;
    let payer = payer_keypair.pubkey();

    // Configuration and draft validation fail before any upload runs.
    let program = ProgramAddresses::resolve(ctx.config)?;
    let authorities = resolve_authorities(draft, payer)?;
    let _ = resolve_mint_to(draft, payer)?;

    let mint_keypair = Keypair::new();
    let mint = mint_keypair.pubkey();
    tracing::debug!(%mint, "composing mint request");

    let uploader = MetadataUploader::new(ctx.http, ctx.config.meta_api_base.as_deref());
    let metadata_uri = uploader.upload_if_needed(draft, &mint).await?;

    let prepared = compose(
        draft,
        &program,
        &authorities,
        payer,
        mint,
        metadata_uri.as_deref(),
        ctx.client_ref,
    )?;

    let blockhash = ctx.rpc.get_latest_blockhash().await?;
    let transaction = Transaction::new_signed_with_payer(
        &prepared.instructions,
        Some(&payer),
        &[payer_keypair, &mint_keypair],
        blockhash,
    );
    let signature = ctx.rpc.send_and_confirm_transaction(&transaction).await?;
    tracing::info!(%signature, %mint, "mint transaction confirmed");

    Ok(MintReceipt {
        mint,
        token_account: prepared.destination_ata,
        metadata_uri,
    })
}
