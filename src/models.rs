//! Data models and structures
//!
//! Defines the order entities handed to us by the order store and the
//! process configuration resolved at startup.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Placed,
    Shipped,
    Delivered,
    Cancelled,
}

/// A single product line within an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn new(product_name: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
            unit_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Internal numeric key assigned by the store.
    pub id: i32,
    /// Public, opaque identifier used for lookups.
    pub order_id: String,
    pub customer_name: String,
    pub email: String,
    pub status: OrderStatus,
    pub order_date: NaiveDate,
    pub items: Vec<OrderItem>,
}

// Configuration
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ORDERS_FILE: &str = "data/orders.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    /// Upper bound for one image request; `None` leaves latency unbounded.
    pub image_request_timeout: Option<Duration>,
    pub image_generation_attempts: usize,
    /// Explicit `ORDERS_FILE`; `None` means the optional default fixture.
    pub orders_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        accept_missing_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| crate::Error::Config("GEMINI_API_KEY not set".to_string()))?;

        let image_request_timeout =
            parse_var::<u64>(&lookup, "IMAGE_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);

        let image_generation_attempts =
            parse_var::<usize>(&lookup, "IMAGE_GENERATION_ATTEMPTS")?.unwrap_or(1);
        if image_generation_attempts == 0 {
            return Err(crate::Error::Config(
                "IMAGE_GENERATION_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            gemini_api_key,
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            image_request_timeout,
            image_generation_attempts,
            orders_file: lookup("ORDERS_FILE").map(PathBuf::from),
        })
    }
}

/// A missing `.env` is fine; one that fails to parse is not.
fn accept_missing_dotenv<T>(loaded: std::result::Result<T, dotenvy::Error>) -> crate::Result<()> {
    match loaded {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> crate::Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            crate::Error::Config(format!("{} has an invalid value: '{}'", key, raw))
        }),
    }
}
