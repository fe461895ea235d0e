//! Presigned-upload grants against S3-compatible object storage.

use std::time::Duration;

use rusty_s3::{Bucket, Credentials, S3Action, UrlStyle};

use crate::config::RelayConfig;

pub const MAX_LOGO_BYTES: u64 = 2 * 1024 * 1024;
pub const MAX_JSON_BYTES: u64 = 50 * 1024;
pub const ALLOWED_LOGO_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];
pub const UPLOAD_URL_TTL: Duration = Duration::from_secs(600);

/// The two asset kinds a mint may upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Logo,
    Json,
}

impl UploadKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "logo" => Some(UploadKind::Logo),
            "json" => Some(UploadKind::Json),
            _ => None,
        }
    }

    pub fn max_bytes(self) -> u64 {
        match self {
            UploadKind::Logo => MAX_LOGO_BYTES,
            UploadKind::Json => MAX_JSON_BYTES,
        }
    }

    /// Object key for an upload; logos keep an extension matching their
    /// content type.
    pub fn object_key(self, mint: &str, content_type: &str) -> String {
        match self {
            UploadKind::Logo => {
                let ext = match content_type {
                    "image/png" => "png",
                    "image/jpeg" => "jpg",
                    "image/webp" => "webp",
                    _ => "bin",
                };
                format!("logos/{mint}.{ext}")
            }
            UploadKind::Json => format!("meta/{mint}.json"),
        }
    }
}

/// Signs time-boxed PUT URLs for one bucket.
pub struct Presigner {
    bucket: Bucket,
    credentials: Credentials,
    account_id: Option<String>,
    bucket_name: String,
    public_cdn_base: Option<String>,
}

impl Presigner {
    /// `None` when any storage credential is missing; the presign
    /// endpoint reports 500 in that case.
    pub fn from_config(config: &RelayConfig) -> Option<Self> {
        let endpoint = config.s3_endpoint()?;
        let bucket_name = config.r2_bucket.clone()?;
        let access_key = config.r2_access_key_id.clone()?;
        let secret_key = config.r2_secret_access_key.clone()?;
        let endpoint_url = endpoint.parse::<url::Url>().ok()?;
        let bucket = Bucket::new(endpoint_url, UrlStyle::Path, bucket_name.clone(), "auto").ok()?;
        Some(Self {
            bucket,
            credentials: Credentials::new(access_key, secret_key),
            account_id: config.r2_account_id.clone(),
            bucket_name,
            public_cdn_base: config
                .public_cdn_base_url
                .as_deref()
                .map(|base| base.trim_end_matches('/').to_string()),
        })
    }

    /// A presigned PUT URL bound to the object's content type, plus the
    /// eventual public read URL.
    pub fn presign_put(&self, key: &str, content_type: &str) -> (String, String) {
        let mut action = self.bucket.put_object(Some(&self.credentials), key);
        action.headers_mut().insert("content-type", content_type);
        let upload_url = action.sign(UPLOAD_URL_TTL).to_string();
        (upload_url, self.public_url(key))
    }

    /// Public read URL, preferring the CDN base over the raw bucket
    /// host.
    pub fn public_url(&self, key: &str) -> String {
        if let Some(base) = &self.public_cdn_base {
            return format!("{base}/{key}");
        }
        match &self.account_id {
            Some(account) => format!(
                "https://{}.{account}.r2.cloudflarestorage.com/{key}",
                self.bucket_name
            ),
            None => String::new(),
        }
    }
}
