//! AI service integration for product image generation
//!
//! Provides the image generation seam and its Gemini implementation, which
//! asks for mixed text and image output and keeps the first inline image.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::{GeminiImageClient, GeminiSessionFactory, IMAGE_MODEL, RESPONSE_MODALITIES};
pub use mock::MockImageGenerationClient;

use crate::ImageGenerationError;
use async_trait::async_trait;

pub type ImageResult<T> = std::result::Result<T, ImageGenerationError>;

/// Raw bytes of a generated image. Ownership passes to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage(Vec<u8>);

impl GeneratedImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Best-effort content type sniffed from the payload.
    pub fn mime_type(&self) -> &'static str {
        mime::detect_image_mime(&self.0)
    }
}

impl AsRef<[u8]> for GeneratedImage {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> ImageResult<GeneratedImage>;
}
