//! Image acquisition
//!
//! Turns either the bundled default asset or a user-selected file into a
//! base64 data URL used for both preview and inference.

pub mod assets;
pub mod data_url;
pub mod mime;
pub mod mock;
pub mod selection;

pub use assets::{FsAssetLoader, HttpAssetLoader};
pub use data_url::DataUrl;
pub use mock::MockAssetLoader;
pub use selection::{
    read_selected, validate_selection, FileInput, SelectedFile, MAX_UPLOAD_BYTES,
};

use crate::Result;
use async_trait::async_trait;

/// Static asset retrieval by path.
#[async_trait]
pub trait AssetService: Send + Sync {
    async fn fetch_asset(&self, location: &str) -> Result<Vec<u8>>;
}

/// Fetch the default image and encode it with its sniffed content type.
pub async fn load_default(assets: &dyn AssetService, location: &str) -> Result<DataUrl> {
    let bytes = assets.fetch_asset(location).await?;
    let mime_type = mime::detect_image_mime(&bytes);
    tracing::debug!(
        "Loaded default image {} ({} bytes, {})",
        location,
        bytes.len(),
        mime_type
    );
    Ok(DataUrl::from_bytes(mime_type, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_load_default_sniffs_mime() {
        let assets = MockAssetLoader::new().with_asset(
            "default-stone.webp",
            vec![
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50,
            ],
        );

        let url = load_default(&assets, "/default-stone.webp").await.unwrap();
        assert_eq!(url.mime_type(), "image/webp");
        assert!(!url.is_empty());
    }

    #[tokio::test]
    async fn test_load_default_propagates_read_error() {
        let assets = MockAssetLoader::new();
        let err = load_default(&assets, "default-stone.webp").await.unwrap_err();
        assert!(matches!(err, Error::Read(_)));
    }
}
