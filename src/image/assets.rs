use super::AssetService;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;

pub const DEFAULT_LOAD_FAILED_MESSAGE: &str = "Failed to load default image";

/// Serves bundled assets from a directory on disk.
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AssetService for FsAssetLoader {
    async fn fetch_asset(&self, location: &str) -> Result<Vec<u8>> {
        let path = self.root.join(location.trim_start_matches('/'));
        tracing::debug!("Loading asset from {}", path.display());

        tokio::fs::read(&path).await.map_err(|e| {
            tracing::error!("Failed to load asset {}: {}", path.display(), e);
            Error::Read(DEFAULT_LOAD_FAILED_MESSAGE.to_string())
        })
    }
}

/// Fetches bundled assets from a static file server.
pub struct HttpAssetLoader {
    client: Client,
    base_url: String,
}

impl HttpAssetLoader {
    pub fn new(base_url: String) -> Self {
        Self::new_with_client(base_url, Client::new())
    }

    pub fn new_with_client(base_url: String, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AssetService for HttpAssetLoader {
    async fn fetch_asset(&self, location: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{}", self.base_url, location.trim_start_matches('/'));
        tracing::debug!("Fetching asset {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Failed to fetch asset {}: {}", url, e);
            Error::Read(DEFAULT_LOAD_FAILED_MESSAGE.to_string())
        })?;

        if !response.status().is_success() {
            tracing::error!("Asset fetch {} returned status {}", url, response.status());
            return Err(Error::Read(DEFAULT_LOAD_FAILED_MESSAGE.to_string()));
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read asset body {}: {}", url, e);
            Error::Read(DEFAULT_LOAD_FAILED_MESSAGE.to_string())
        })?;

        Ok(bytes.to_vec())
    }
}
