use super::mime::{content_type_for_path, ACCEPTED_TYPES};
use super::DataUrl;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Largest upload accepted, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

pub const INVALID_TYPE_MESSAGE: &str = "Please upload a valid image file";
pub const TOO_LARGE_MESSAGE: &str = "Image size should be less than 20MB";
pub const READ_FAILED_MESSAGE: &str = "Failed to read the image file. Please try again.";

/// A file chosen through the picker, with the metadata the picker declares.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub path: PathBuf,
}

impl SelectedFile {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            tracing::error!("Failed to stat {}: {}", path.display(), e);
            Error::Read(READ_FAILED_MESSAGE.to_string())
        })?;

        Ok(Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            content_type: content_type_for_path(path).to_string(),
            size: metadata.len(),
            path: path.to_path_buf(),
        })
    }
}

/// The upload control. Holds at most one pending selection; taking it clears
/// the input so the same file can be picked again.
#[derive(Debug, Default)]
pub struct FileInput {
    selection: Option<SelectedFile>,
}

impl FileInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, file: SelectedFile) {
        self.selection = Some(file);
    }

    pub fn take(&mut self) -> Option<SelectedFile> {
        self.selection.take()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_none()
    }

    pub fn accept(&self) -> &'static str {
        ACCEPTED_TYPES
    }
}

pub fn validate_selection(file: &SelectedFile) -> Result<()> {
    if !file.content_type.starts_with("image/") {
        return Err(Error::Validation(INVALID_TYPE_MESSAGE.to_string()));
    }
    if file.size > MAX_UPLOAD_BYTES {
        return Err(Error::Validation(TOO_LARGE_MESSAGE.to_string()));
    }
    Ok(())
}

/// Validate a selection and read it into a data URL tagged with its declared
/// content type.
pub async fn read_selected(file: &SelectedFile) -> Result<DataUrl> {
    validate_selection(file)?;

    let bytes = tokio::fs::read(&file.path).await.map_err(|e| {
        tracing::error!("Failed to read {}: {}", file.path.display(), e);
        Error::Read(READ_FAILED_MESSAGE.to_string())
    })?;

    tracing::debug!("Read {} ({} bytes)", file.name, bytes.len());
    Ok(DataUrl::from_bytes(&file.content_type, &bytes))
}
