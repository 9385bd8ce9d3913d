//! Storefront backend services for order summaries and AI product imagery
//!
//! Shapes order lines into response summaries and generates product images
//! through Gemini's multi-modal `generateContent` API.

pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod orders;

pub use error::{Error, ImageGenerationError, Result};
