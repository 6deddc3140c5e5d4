//! Profile photo retrieval.
//!
//! Photos are optional: any failure here is logged and the CV is rendered without one.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::layout::ImageData;

/// Upper bound on a downloaded photo.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("photo request returned status {0}")]
    Status(u16),

    #[error("photo exceeds {MAX_PHOTO_BYTES} bytes")]
    TooLarge,

    #[error("malformed data URL: {0}")]
    DataUrl(String),

    #[error("unsupported photo URL scheme: {0}")]
    Unsupported(String),
}

#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ImageData, AssetError>;
}

/// Fetches `http(s)` URLs and decodes inline `data:` URLs.
#[derive(Clone)]
pub struct HttpPhotoSource {
    client: Client,
}

impl HttpPhotoSource {
    pub fn new(timeout: Duration) -> Result<Self, AssetError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PhotoSource for HttpPhotoSource {
    async fn fetch(&self, url: &str) -> Result<ImageData, AssetError> {
        if url.starts_with("data:") {
            return decode_data_url(url);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            let scheme = url.split(':').next().unwrap_or_default();
            return Err(AssetError::Unsupported(scheme.to_string()));
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status(status.as_u16()));
        }
        if response
            .content_length()
            .is_some_and(|len| len > MAX_PHOTO_BYTES as u64)
        {
            return Err(AssetError::TooLarge);
        }

        let body = response.bytes().await?;
        if body.len() > MAX_PHOTO_BYTES {
            return Err(AssetError::TooLarge);
        }
        debug!(bytes = body.len(), "Fetched profile photo");
        Ok(ImageData(body))
    }
}

/// Decodes `data:[<mediatype>][;base64],<data>`.
pub fn decode_data_url(url: &str) -> Result<ImageData, AssetError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| AssetError::DataUrl("missing data: prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AssetError::DataUrl("missing ',' separator".to_string()))?;

    let bytes = if header.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| AssetError::DataUrl(e.to_string()))?
    } else {
        payload.as_bytes().to_vec()
    };

    if bytes.is_empty() {
        return Err(AssetError::DataUrl("empty payload".to_string()));
    }
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(AssetError::TooLarge);
    }
    Ok(ImageData(Bytes::from(bytes)))
}

/// Fetches the photo at `url`, returning `None` on any failure.
pub async fn resolve_photo(source: &dyn PhotoSource, url: Option<&str>) -> Option<ImageData> {
    let url = url?;
    match source.fetch(url).await {
        Ok(photo) => Some(photo),
        Err(e) => {
            warn!(error = %e, "Could not load profile photo; continuing without it");
            None
        }
    }
}
