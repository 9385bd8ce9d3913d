//! Request-facing orchestration over the order store and image generator.

use crate::ai::{GeminiImageClient, GeminiSessionFactory, GeneratedImage, ImageGenerationService};
use crate::models::{Config, DEFAULT_ORDERS_FILE};
use crate::orders::{project_order, InMemoryOrderRepository, OrderRepository, OrderSummary};
use crate::{Error, ImageGenerationError, Result};
use std::path::Path;
use std::time::Duration;
use tokio_retry::{strategy::FixedInterval, RetryIf};
use tracing::{info, warn};

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Serves order summaries and product images for the web layer.
pub struct App {
    orders: Box<dyn OrderRepository>,
    images: Box<dyn ImageGenerationService>,
    image_attempts: usize,
    retry_delay: Duration,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub orders: Box<dyn OrderRepository>,
    pub images: Box<dyn ImageGenerationService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// `image_attempts` is how many times a prompt is sent when the service
    /// answers without an image; it is clamped to at least one.
    pub fn with_services(services: AppServices, image_attempts: usize) -> Self {
        Self {
            orders: services.orders,
            images: services.images,
            image_attempts: image_attempts.max(1),
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Construct an app from resolved configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let orders = Self::load_orders(config)?;

        let sessions = GeminiSessionFactory::new()
            .with_base_url(config.gemini_base_url.clone())
            .with_timeout(config.image_request_timeout);
        let images =
            GeminiImageClient::with_session_factory(config.gemini_api_key.clone(), sessions);

        info!(
            "Image provider: Gemini (attempts per prompt: {})",
            config.image_generation_attempts
        );

        Ok(Self::with_services(
            AppServices {
                orders: Box::new(orders),
                images: Box::new(images),
            },
            config.image_generation_attempts,
        ))
    }

    /// An explicit `ORDERS_FILE` must exist; the default fixture is optional.
    fn load_orders(config: &Config) -> Result<InMemoryOrderRepository> {
        match &config.orders_file {
            Some(path) if !path.exists() => Err(Error::Config(format!(
                "ORDERS_FILE {} does not exist",
                path.display()
            ))),
            Some(path) => InMemoryOrderRepository::from_json_file(path),
            None => {
                let path = Path::new(DEFAULT_ORDERS_FILE);
                if path.exists() {
                    InMemoryOrderRepository::from_json_file(path)
                } else {
                    warn!(
                        "Orders file {} not found, starting with an empty store",
                        path.display()
                    );
                    Ok(InMemoryOrderRepository::new())
                }
            }
        }
    }

    /// Look up an order and shape it for the response body.
    pub async fn order_summary(&self, order_id: &str) -> Result<OrderSummary> {
        let order = self
            .orders
            .find_by_order_id(order_id)
            .await?
            .ok_or_else(|| Error::OrderNotFound(order_id.to_string()))?;

        info!("Summarizing order {} ({} lines)", order.order_id, order.items.len());
        project_order(&order)
    }

    /// Generate a product image, re-prompting only when the service
    /// answered without one.
    pub async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        let retries = self.image_attempts - 1;
        let strategy = FixedInterval::new(self.retry_delay).take(retries);

        let image = RetryIf::start(
            strategy,
            || self.images.generate_image(prompt),
            |e: &ImageGenerationError| {
                let retry = matches!(e, ImageGenerationError::NoImageProduced);
                if retry {
                    warn!("No image in response, re-prompting");
                }
                retry
            },
        )
        .await?;

        info!("Generated image ({} bytes, {})", image.len(), image.mime_type());
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::{App, AppServices};
    use crate::ai::MockImageGenerationClient;
    use crate::models::{Config, Order, OrderItem, OrderStatus};
    use crate::orders::InMemoryOrderRepository;
    use crate::{Error, ImageGenerationError};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn build_test_app(images: MockImageGenerationClient, attempts: usize) -> App {
        let orders = InMemoryOrderRepository::new().with_order(Order {
            id: 3,
            order_id: "ORD-3".to_string(),
            customer_name: "Barbara".to_string(),
            email: "barbara@example.com".to_string(),
            status: OrderStatus::Delivered,
            order_date: NaiveDate::from_ymd_opt(2026, 7, 4).unwrap(),
            items: vec![OrderItem::new("Tea Tin", 4, dec!(6.25))],
        });

        App::with_services(
            AppServices {
                orders: Box::new(orders),
                images: Box::new(images),
            },
            attempts,
        )
        .with_retry_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_order_summary_projects_lines() {
        let app = build_test_app(MockImageGenerationClient::new(), 1);

        let summary = app.order_summary("ORD-3").await.unwrap();
        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.items[0].total_price, dec!(25.00));
    }

    #[tokio::test]
    async fn test_order_summary_missing_order() {
        let app = build_test_app(MockImageGenerationClient::new(), 1);

        let err = app.order_summary("ORD-404").await.unwrap_err();
        assert!(matches!(err, Error::OrderNotFound(ref id) if id == "ORD-404"));
    }

    #[tokio::test]
    async fn test_generate_image_reprompts_on_no_image() {
        let images = MockImageGenerationClient::new()
            .with_no_image()
            .with_image_response(vec![0xFF, 0xD8, 0xFF, 0xE0]);
        let calls = images.clone();
        let app = build_test_app(images, 3);

        let image = app.generate_image("a tea tin").await.unwrap();

        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(calls.get_call_count(), 2);
    }

    #[tokio::test]
    async fn test_generate_image_gives_up_after_attempts() {
        let images = MockImageGenerationClient::new().with_no_image();
        let calls = images.clone();
        let app = build_test_app(images, 2);

        let err = app.generate_image("a tea tin").await.unwrap_err();

        assert!(matches!(
            err,
            Error::ImageGeneration(ImageGenerationError::NoImageProduced)
        ));
        assert_eq!(calls.get_call_count(), 2);
    }

    #[tokio::test]
    async fn test_generate_image_never_retries_request_failures() {
        let images = MockImageGenerationClient::new()
            .with_failure("invalid API key")
            .with_image_response(vec![1]);
        let calls = images.clone();
        let app = build_test_app(images, 5);

        let err = app.generate_image("a tea tin").await.unwrap_err();

        assert!(err.to_string().contains("invalid API key"));
        assert_eq!(calls.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_by_default() {
        let images = MockImageGenerationClient::new().with_no_image();
        let calls = images.clone();
        let app = build_test_app(images, 0);

        assert!(app.generate_image("x").await.is_err());
        assert_eq!(calls.get_call_count(), 1);
    }

    fn config_with_orders_file(orders_file: Option<&str>) -> Config {
        Config::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("key".to_string()),
            "ORDERS_FILE" => orders_file.map(str::to_string),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_explicit_missing_orders_file_is_config_error() {
        let config = config_with_orders_file(Some("/nonexistent/orders.json"));

        let err = App::new(&config).err().unwrap();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("ORDERS_FILE")));
    }

    #[tokio::test]
    async fn test_explicit_orders_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(
            &path,
            serde_json::json!([{
                "id": 9,
                "orderId": "ORD-9",
                "customerName": "Edsger",
                "email": "edsger@example.com",
                "status": "PLACED",
                "orderDate": "2026-08-01",
                "items": [{ "productName": "Chalk", "quantity": 3, "unitPrice": "1.50" }]
            }])
            .to_string(),
        )
        .unwrap();

        let config = config_with_orders_file(path.to_str());
        let app = App::new(&config).unwrap();

        let summary = app.order_summary("ORD-9").await.unwrap();
        assert_eq!(summary.items[0].total_price, dec!(4.50));
    }

    #[tokio::test]
    async fn test_order_summary_surfaces_price_overflow() {
        let orders = InMemoryOrderRepository::new().with_order(Order {
            id: 4,
            order_id: "ORD-4".to_string(),
            customer_name: "Tony".to_string(),
            email: "tony@example.com".to_string(),
            status: OrderStatus::Placed,
            order_date: NaiveDate::from_ymd_opt(2026, 7, 5).unwrap(),
            items: vec![OrderItem::new("Vault", 2, rust_decimal::Decimal::MAX)],
        });
        let app = App::with_services(
            AppServices {
                orders: Box::new(orders),
                images: Box::new(MockImageGenerationClient::new()),
            },
            1,
        );

        let err = app.order_summary("ORD-4").await.unwrap_err();
        assert!(matches!(err, Error::PriceOverflow { .. }));
    }
}
