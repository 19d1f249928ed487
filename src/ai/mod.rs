//! Inference service integration
//!
//! Sends an encoded stone photo plus a fixed prompt to a multimodal model and
//! returns its free-text description.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiStoneClient;
pub use mock::MockInferenceClient;

use crate::image::DataUrl;
use crate::Result;
use async_trait::async_trait;

/// Single-attempt image analysis. Failures surface as `Error::Inference`.
#[async_trait]
pub trait InferenceService: Send + Sync {
    async fn analyze(&self, image: &DataUrl, prompt: &str) -> Result<String>;
}
