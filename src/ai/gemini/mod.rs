pub mod image;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use image::{GeminiImageClient, IMAGE_MODEL, RESPONSE_MODALITIES};
pub use session::{ContentSession, GeminiSession, GeminiSessionFactory, SessionFactory};
