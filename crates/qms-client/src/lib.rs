//! Client pipeline for the QMS token mint program.
//!
//! The flow mirrors the mint wizard: a [`draft::MintDraft`] is edited
//! step by step, [`preflight`] warns about likely failures, and
//! [`mint::mint_token`] derives accounts, resolves authorities,
//! normalizes the supply, uploads metadata when requested, and submits
//! one transaction.

pub mod amount;
pub mod authority;
pub mod config;
pub mod draft;
pub mod error;
pub mod metadata;
pub mod mint;
pub mod pda;
pub mod preflight;
pub mod store;

pub use authority::{resolve_authorities, ResolvedAuthorities};
pub use config::{ClientConfig, NetworkKey, ProgramAddresses};
pub use draft::{MintDraft, WizardStep};
pub use error::QmsClientError;
pub use mint::{mint_token, MintContext, MintReceipt};
pub use preflight::{FeeConfig, Preflight, PreflightStatus};
pub use store::DraftStore;
