//! Order lookup and response shaping
//!
//! The order store is an external collaborator; this module only defines
//! the lookup seam and projects order lines into API-facing summaries.

pub mod memory;
pub mod summary;

pub use memory::InMemoryOrderRepository;
pub use summary::{line_total, project, project_order, OrderLineSummary, OrderSummary};

use crate::models::Order;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Exact-match lookup by public order id.
    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Order>>;
}
