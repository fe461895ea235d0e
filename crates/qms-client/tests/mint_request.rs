//! End-to-end composition of a mint request, exercised without a
//! network: draft in, instructions and resolved values out.

use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;

use qms_client::amount::parse_amount_to_base_units;
use qms_client::draft::{AuthorityMode, MetadataMode, MintDraft, SupplyType};
use qms_client::mint::prepare_mint;
use qms_client::preflight::collect_issues;
use qms_client::{resolve_authorities, ClientConfig};

fn fixed_supply_draft(wallet: &Pubkey) -> MintDraft {
    let mut draft = MintDraft::default();
    draft.token.name = "Coin".to_string();
    draft.token.symbol = "CN".to_string();
    draft.token.decimals = 9;
    draft.token.supply = "1000".to_string();
    draft.token.mint_to_address = wallet.to_string();
    draft.set_supply_type(SupplyType::Fixed);
    draft.authority.revoke_freeze = true;
    draft.confirmations.revoke_mint_acknowledged = true;
    draft
}

#[test]
fn fixed_supply_scenario_resolves_and_composes() {
    let wallet = Pubkey::new_unique();
    let program_id = Pubkey::new_unique();
    let draft = fixed_supply_draft(&wallet);

    // No preflight issues for a connected wallet with valid addresses;
    // the balance comparison is the only asynchronous part.
    assert!(collect_issues(&draft, Some(&wallet)).is_empty());
    assert!(!draft.has_hard_errors(true));

    let authorities = resolve_authorities(&draft, wallet).unwrap();
    assert_eq!(authorities.final_mint_authority, None);
    assert_eq!(authorities.final_freeze_authority, None);
    assert!(!authorities.is_mutable);

    let supply = parse_amount_to_base_units(&draft.token.supply, draft.token.decimals);
    assert_eq!(supply.to_string(), "1000000000000");

    let config = ClientConfig {
        program_id: Some(program_id.to_string()),
        ..ClientConfig::default()
    };
    let mint = Pubkey::new_unique();
    let prepared = prepare_mint(&draft, &config, wallet, mint, None, None).unwrap();

    assert_eq!(prepared.instructions.len(), 1);
    assert_eq!(
        prepared.destination_ata,
        get_associated_token_address(&wallet, &mint)
    );
}

#[test]
fn each_attempt_derives_a_distinct_account_set() {
    let wallet = Pubkey::new_unique();
    let program_id = Pubkey::new_unique();
    let draft = fixed_supply_draft(&wallet);
    let config = ClientConfig {
        program_id: Some(program_id.to_string()),
        ..ClientConfig::default()
    };

    let mint_a = Pubkey::new_unique();
    let mint_b = Pubkey::new_unique();
    let prepared_a = prepare_mint(&draft, &config, wallet, mint_a, None, None).unwrap();
    let prepared_b = prepare_mint(&draft, &config, wallet, mint_b, None, None).unwrap();

    assert_ne!(prepared_a.destination_ata, prepared_b.destination_ata);
    // The config and authority PDAs stay fixed across attempts.
    assert_eq!(
        prepared_a.instructions[0].accounts[1].pubkey,
        prepared_b.instructions[0].accounts[1].pubkey
    );
    assert_eq!(
        prepared_a.instructions[0].accounts[4].pubkey,
        prepared_b.instructions[0].accounts[4].pubkey
    );
    assert_ne!(
        prepared_a.instructions[0].accounts[3].pubkey,
        prepared_b.instructions[0].accounts[3].pubkey
    );
}

#[test]
fn advanced_mintable_draft_keeps_delegates_through_composition() {
    let wallet = Pubkey::new_unique();
    let delegate = Pubkey::new_unique();
    let program_id = Pubkey::new_unique();

    let mut draft = fixed_supply_draft(&wallet);
    draft.set_authority_mode(AuthorityMode::Advanced);
    draft.set_supply_type(SupplyType::Mintable);
    draft.authority.revoke_mint = false;
    draft.authority.revoke_freeze = false;
    draft.authority.authority_type = qms_client::draft::AuthorityType::Pda;
    draft.authority.authority_address = delegate.to_string();
    draft.set_metadata_mode(MetadataMode::Onchain);

    let authorities = resolve_authorities(&draft, wallet).unwrap();
    assert_eq!(authorities.final_mint_authority, Some(delegate));
    assert_eq!(authorities.final_freeze_authority, Some(delegate));
    assert_eq!(authorities.update_authority, wallet);
    assert!(authorities.is_mutable);

    let config = ClientConfig {
        program_id: Some(program_id.to_string()),
        ..ClientConfig::default()
    };
    let prepared = prepare_mint(
        &draft,
        &config,
        wallet,
        Pubkey::new_unique(),
        Some("https://cdn.example/meta/mint.json"),
        None,
    )
    .unwrap();
    assert_eq!(prepared.instructions.len(), 3);
}
