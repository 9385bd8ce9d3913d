use super::OrderRepository;
use crate::models::Order;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Order store backed by a map keyed on the public order id.
#[derive(Clone, Debug)]
pub struct InMemoryOrderRepository {
    orders: Arc<Mutex<HashMap<String, Order>>>,
    lookup_count: Arc<Mutex<usize>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: Arc::new(Mutex::new(HashMap::new())),
            lookup_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Load a JSON array of orders.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let orders: Vec<Order> = serde_json::from_str(&json)?;
        tracing::info!("Loaded {} orders from {}", orders.len(), path.display());

        Ok(orders
            .into_iter()
            .fold(Self::new(), |repo, order| repo.with_order(order)))
    }

    pub fn with_order(self, order: Order) -> Self {
        self.orders
            .lock()
            .unwrap()
            .insert(order.order_id.clone(), order);
        self
    }

    pub fn get_lookup_count(&self) -> usize {
        *self.lookup_count.lock().unwrap()
    }

    pub fn len(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Order>> {
        *self.lookup_count.lock().unwrap() += 1;

        let order = self.orders.lock().unwrap().get(order_id).cloned();
        if order.is_none() {
            tracing::debug!("No order stored under id {}", order_id);
        }
        Ok(order)
    }
}
