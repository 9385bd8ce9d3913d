//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Line total for '{product}' in order {order_id} exceeds the decimal range")]
    PriceOverflow { order_id: String, product: String },

    #[error(transparent)]
    ImageGeneration(#[from] ImageGenerationError),
}

/// Outcome kinds of a failed image generation call.
///
/// `NoImageProduced` means the service answered but returned no image part;
/// `RequestFailed` covers everything that prevented a usable answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageGenerationError {
    #[error("No image generated")]
    NoImageProduced,

    #[error("Image generation failed: {0}")]
    RequestFailed(String),
}

impl ImageGenerationError {
    /// Underlying cause for `RequestFailed`, if any.
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::RequestFailed(cause) => Some(cause),
            Self::NoImageProduced => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_keeps_cause() {
        let err = ImageGenerationError::RequestFailed("connection refused".to_string());
        assert_eq!(err.cause(), Some("connection refused"));
        assert_eq!(err.to_string(), "Image generation failed: connection refused");
    }

    #[test]
    fn test_image_error_is_transparent_in_crate_error() {
        let err: Error = ImageGenerationError::NoImageProduced.into();
        assert_eq!(err.to_string(), "No image generated");
        assert!(matches!(
            err,
            Error::ImageGeneration(ImageGenerationError::NoImageProduced)
        ));
    }
}
