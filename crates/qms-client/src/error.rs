use thiserror::Error;

/// Failures surfaced by the mint pipeline.
///
/// Validation variants carry the field label so callers can attach the
/// message to the offending input instead of a generic banner.
#[derive(Debug, Error)]
pub enum QmsClientError {
    #[error("Wallet not connected.")]
    WalletNotConnected,

    #[error("Missing QMS program id.")]
    MissingProgramId,

    #[error("{label} is required.")]
    MissingAddress { label: &'static str },

    #[error("{label} is invalid.")]
    InvalidAddress { label: &'static str },

    #[error("Initial supply exceeds the 64-bit base-unit range.")]
    SupplyOutOfRange,

    #[error(
        "Metadata upload server not configured. Set META_API_BASE or switch to off-chain metadata."
    )]
    MetadataServerUnconfigured,

    #[error("Unsupported logo format.")]
    UnsupportedLogoFormat,

    #[error("Failed to get upload URL.")]
    PresignFailed,

    #[error("Upload failed.")]
    UploadFailed,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rpc error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
