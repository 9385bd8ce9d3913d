use super::session::{GeminiSessionFactory, SessionFactory};
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
use crate::ai::{GeneratedImage, ImageGenerationService, ImageResult};
use crate::{Error, ImageGenerationError};
use async_trait::async_trait;
use base64::Engine as _;

pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Every request asks for both text and image parts.
pub const RESPONSE_MODALITIES: [&str; 2] = ["TEXT", "IMAGE"];

pub struct GeminiImageClient {
    api_key: String,
    sessions: Box<dyn SessionFactory>,
}

impl GeminiImageClient {
    pub fn new(api_key: String) -> Self {
        Self::with_session_factory(api_key, GeminiSessionFactory::new())
    }

    pub fn with_session_factory(api_key: String, sessions: impl SessionFactory + 'static) -> Self {
        Self {
            api_key,
            sessions: Box::new(sessions),
        }
    }

    fn build_request(prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(prompt)],
            }],
            generation_config: GenerationConfig {
                response_modalities: RESPONSE_MODALITIES
                    .iter()
                    .map(|m| m.to_string())
                    .collect(),
            },
        }
    }
}

fn request_failed(err: Error) -> ImageGenerationError {
    tracing::error!("Gemini image request failed: {}", err);
    ImageGenerationError::RequestFailed(err.to_string())
}

/// Return the payload of the first part carrying non-empty inline data.
///
/// Later image parts are ignored; we assume the service's first image is
/// the one to keep.
pub fn first_inline_image(response: &GenerateContentResponse) -> ImageResult<Vec<u8>> {
    for part in response.parts() {
        let Some(data) = part.inline_data.as_ref().and_then(|blob| blob.data.as_deref()) else {
            continue;
        };
        if data.is_empty() {
            continue;
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| {
                request_failed(Error::AiProvider(format!(
                    "Failed to decode Gemini inline image data: {}",
                    e
                )))
            })?;
        if bytes.is_empty() {
            continue;
        }

        if let Some(mime_type) = part.inline_data.as_ref().and_then(|b| b.mime_type.as_deref()) {
            tracing::debug!("Gemini returned image with mime_type: {}", mime_type);
        }
        return Ok(bytes);
    }

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        tracing::warn!("Gemini blocked the image prompt: {}", reason);
    } else {
        tracing::warn!(
            "Gemini response had {} parts but no inline image data",
            response.parts().len()
        );
    }
    Err(ImageGenerationError::NoImageProduced)
}

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate_image(&self, prompt: &str) -> ImageResult<GeneratedImage> {
        let session = self.sessions.open(&self.api_key).map_err(request_failed)?;

        let request = Self::build_request(prompt);
        let response = session
            .generate_content(IMAGE_MODEL, &request)
            .await
            .map_err(request_failed)?;

        first_inline_image(&response).map(GeneratedImage::new)
    }
}
