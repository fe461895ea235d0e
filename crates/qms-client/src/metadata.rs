//! Off-chain asset uploads for on-chain metadata.
//!
//! Each asset goes through a two-phase upload: ask the relay for a
//! time-boxed presigned PUT URL, then write the bytes straight to object
//! storage. Both assets (logo, then the metadata JSON document) must land
//! before any transaction is composed.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::draft::{MetadataMode, MintDraft};
use crate::error::QmsClientError;

pub const LOGO_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresignRequest<'a> {
    mint: &'a str,
    kind: &'a str,
    content_type: &'a str,
    content_length: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignResponse {
    pub upload_url: String,
    pub public_url: String,
}

/// The document written to `meta/<mint>.json` and referenced as the
/// token's metadata URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadataDoc {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
    pub external_url: String,
    pub attributes: Vec<MetadataAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataAttribute {
    pub trait_type: String,
    pub value: String,
}

pub fn build_metadata_doc(draft: &MintDraft, image_url: &str) -> TokenMetadataDoc {
    let mut attributes = Vec::new();
    if !draft.metadata.twitter.is_empty() {
        attributes.push(MetadataAttribute {
            trait_type: "twitter".to_string(),
            value: draft.metadata.twitter.clone(),
        });
    }
    if !draft.metadata.discord.is_empty() {
        attributes.push(MetadataAttribute {
            trait_type: "discord".to_string(),
            value: draft.metadata.discord.clone(),
        });
    }
    TokenMetadataDoc {
        name: draft.token.display_name(),
        symbol: draft.token.display_symbol(),
        description: draft.metadata.description.clone(),
        image: image_url.to_string(),
        external_url: draft.metadata.website.clone(),
        attributes,
    }
}

/// Split a `data:` URL into its content type and decoded payload.
pub fn decode_data_url(data_url: &str) -> (String, Vec<u8>) {
    let (header, payload) = data_url.split_once(',').unwrap_or((data_url, ""));
    let content_type = header
        .strip_prefix("data:")
        .and_then(|h| h.strip_suffix(";base64"))
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = BASE64.decode(payload).unwrap_or_default();
    (content_type, bytes)
}

pub struct MetadataUploader<'a> {
    http: &'a reqwest::Client,
    base: Option<&'a str>,
}

impl<'a> MetadataUploader<'a> {
    pub fn new(http: &'a reqwest::Client, base: Option<&'a str>) -> Self {
        Self { http, base }
    }

    /// Upload the draft's logo and metadata document, returning the
    /// public metadata URI, or `None` when metadata stays off-chain.
    pub async fn upload_if_needed(
        &self,
        draft: &MintDraft,
        mint: &Pubkey,
    ) -> Result<Option<String>, QmsClientError> {
        if draft.metadata.mode != MetadataMode::Onchain {
            return Ok(None);
        }
        let base = self
            .base
            .map(|base| base.trim_end_matches('/'))
            .filter(|base| !base.is_empty())
            .ok_or(QmsClientError::MetadataServerUnconfigured)?;

        let mint = mint.to_string();
        let mut image_url = String::new();

        if !draft.metadata.logo_data_url.is_empty() {
            let (content_type, bytes) = decode_data_url(&draft.metadata.logo_data_url);
            if !LOGO_CONTENT_TYPES.contains(&content_type.as_str()) {
                return Err(QmsClientError::UnsupportedLogoFormat);
            }
            let presign = self
                .request_presign(base, &mint, "logo", &content_type, bytes.len())
                .await?;
            self.upload(&presign.upload_url, bytes, &content_type).await?;
            tracing::debug!(%mint, url = %presign.public_url, "logo uploaded");
            image_url = presign.public_url;
        }

        let doc = build_metadata_doc(draft, &image_url);
        let body = serde_json::to_vec(&doc)?;
        let presign = self
            .request_presign(base, &mint, "json", "application/json", body.len())
            .await?;
        self.upload(&presign.upload_url, body, "application/json")
            .await?;
        tracing::debug!(%mint, url = %presign.public_url, "metadata document uploaded");

        Ok(Some(presign.public_url))
    }

    async fn request_presign(
        &self,
        base: &str,
        mint: &str,
        kind: &str,
        content_type: &str,
        content_length: usize,
    ) -> Result<PresignResponse, QmsClientError> {
        let response = self
            .http
            .post(format!("{base}/api/meta/presign"))
            .json(&PresignRequest {
                mint,
                kind,
                content_type,
                content_length,
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(QmsClientError::PresignFailed);
        }
        Ok(response.json().await?)
    }

    async fn upload(
        &self,
        upload_url: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), QmsClientError> {
        let response = self
            .http
            .put(upload_url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(QmsClientError::UploadFailed);
        }
        Ok(())
    }
}
