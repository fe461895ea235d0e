use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::{read_keypair_file, Keypair, Signer};
use solana_sdk::transaction::Transaction;

use qms_client::config::{parse_pubkey, DEFAULT_FEE_LAMPORTS};
use qms_client::mint::initialize_config_instruction;
use qms_client::{
    mint_token, ClientConfig, DraftStore, FeeConfig, MintContext, MintDraft, NetworkKey,
    ProgramAddresses,
};

#[derive(Parser)]
#[command(name = "qms", version, about = "QMS mint pipeline CLI")]
struct Cli {
    /// Cluster to target: mainnet, devnet, or testnet.
    #[arg(long, default_value = "devnet")]
    network: String,

    /// Explicit RPC endpoint, overriding the network default.
    #[arg(long)]
    rpc: Option<String>,

    /// Keypair file; falls back to SOLANA_WALLET, then the solana CLI
    /// default location.
    #[arg(long)]
    keypair: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the program's config PDA.
    InitConfig(InitConfigArgs),
    /// Run preflight checks against a draft.
    Preflight(DraftArgs),
    /// Mint a token from a draft.
    Mint(DraftArgs),
    /// Persist a draft file as the stored in-progress draft.
    SaveDraft(SaveDraftArgs),
    /// Delete the stored in-progress draft.
    ClearDraft,
}

#[derive(Parser)]
struct InitConfigArgs {
    #[arg(long)]
    treasury: Option<String>,

    #[arg(long, default_value_t = DEFAULT_FEE_LAMPORTS)]
    fee_lamports: u64,
}

#[derive(Parser)]
struct DraftArgs {
    /// Path to a draft JSON file; missing fields take defaults. Falls
    /// back to the stored in-progress draft.
    #[arg(long)]
    draft: Option<PathBuf>,
}

#[derive(Parser)]
struct SaveDraftArgs {
    #[arg(long)]
    draft: PathBuf,

    /// Wizard step to restore to, 1-4.
    #[arg(long, default_value_t = 1)]
    step: u8,
}

fn draft_store() -> Result<DraftStore> {
    let dir = std::env::var_os("QMS_DATA_DIR")
        .map(PathBuf::from)
        .or_else(|| dirs_fallback().map(|home| home.join(".config").join("qms")))
        .ok_or_else(|| anyhow!("no data directory; set QMS_DATA_DIR"))?;
    Ok(DraftStore::new(dir))
}

fn resolve_draft(path: Option<&PathBuf>) -> Result<MintDraft> {
    match path {
        Some(path) => load_draft(path),
        None => Ok(draft_store()?.load().0),
    }
}

fn resolve_keypair(path: Option<PathBuf>) -> Result<Keypair> {
    let path = path
        .or_else(|| std::env::var("SOLANA_WALLET").ok().map(PathBuf::from))
        .or_else(|| {
            dirs_fallback().map(|home| home.join(".config").join("solana").join("id.json"))
        })
        .ok_or_else(|| anyhow!("no keypair path; pass --keypair or set SOLANA_WALLET"))?;
    read_keypair_file(&path).map_err(|err| anyhow!("failed to read keypair {path:?}: {err}"))
}

fn dirs_fallback() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

fn load_draft(path: &PathBuf) -> Result<MintDraft> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading draft {path:?}"))?;
    let value: serde_json::Value = serde_json::from_str(&raw).context("draft is not JSON")?;
    qms_client::store::merge_defaults(&value).ok_or_else(|| anyhow!("draft does not deserialize"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qms_client=info,qms=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    let network = NetworkKey::parse(&cli.network)
        .ok_or_else(|| anyhow!("unknown network {:?}", cli.network))?;
    let endpoint = cli
        .rpc
        .unwrap_or_else(|| config.rpc_endpoint(network).to_string());
    let rpc = RpcClient::new_with_commitment(endpoint, CommitmentConfig::confirmed());
    let http = reqwest::Client::new();

    match cli.command {
        Commands::InitConfig(args) => {
            let payer = resolve_keypair(cli.keypair)?;
            let program = ProgramAddresses::resolve(&config)?;
            let treasury = match &args.treasury {
                Some(value) => parse_pubkey(value, "QMS treasury")?,
                None => program.treasury,
            };
            let config_pda = qms_client::pda::config_address(&program.program_id);
            if rpc.get_account(&config_pda).await.is_ok() {
                println!("Config PDA already initialized: {config_pda}");
                return Ok(());
            }
            let instruction = initialize_config_instruction(
                &program.program_id,
                &payer.pubkey(),
                &treasury,
                args.fee_lamports,
            )?;
            let blockhash = rpc.get_latest_blockhash().await?;
            let transaction = Transaction::new_signed_with_payer(
                &[instruction],
                Some(&payer.pubkey()),
                &[&payer],
                blockhash,
            );
            let signature = rpc.send_and_confirm_transaction(&transaction).await?;
            println!("Config initialized. Signature: {signature}");
            println!("Config PDA: {config_pda}");
        }
        Commands::Preflight(args) => {
            let payer = resolve_keypair(cli.keypair)?;
            let draft = resolve_draft(args.draft.as_ref())?;
            let report = qms_client::preflight::run(
                &draft,
                Some(&payer.pubkey()),
                &rpc,
                &FeeConfig::default(),
            )
            .await;
            println!("status: {}", report.status.as_str());
            for issue in &report.issues {
                println!("- {issue}");
            }
        }
        Commands::Mint(args) => {
            let payer = resolve_keypair(cli.keypair)?;
            let draft = resolve_draft(args.draft.as_ref())?;
            let ctx = MintContext {
                rpc: &rpc,
                payer: Some(&payer),
                config: &config,
                http: &http,
                client_ref: None,
            };
            let receipt = mint_token(&draft, &ctx).await?;
            println!("Mint: {}", receipt.mint);
            println!("Token account: {}", receipt.token_account);
            match &receipt.metadata_uri {
                Some(uri) => println!("Metadata: {uri}"),
                None => println!("Metadata: off-chain"),
            }
        }
        Commands::SaveDraft(args) => {
            let draft = load_draft(&args.draft)?;
            draft_store()?.save(&draft, args.step)?;
            println!("Draft saved.");
        }
        Commands::ClearDraft => {
            draft_store()?.clear()?;
            println!("Draft cleared.");
        }
    }

    Ok(())
}
