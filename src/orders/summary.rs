use crate::models::{Order, OrderItem, OrderStatus};
use crate::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response-facing view of a single order line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineSummary {
    pub product_name: String,
    pub quantity: u32,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: String,
    pub customer_name: String,
    pub email: String,
    pub status: OrderStatus,
    pub order_date: NaiveDate,
    pub items: Vec<OrderLineSummary>,
}

/// `quantity * unit_price`, or `None` when it exceeds `Decimal`'s range.
pub fn line_total(item: &OrderItem) -> Option<Decimal> {
    Decimal::from(item.quantity).checked_mul(item.unit_price)
}

/// Project an order line into its summary. `total_price` is
/// `quantity * unit_price` in decimal arithmetic, saturating at
/// `Decimal::MAX`/`Decimal::MIN` instead of panicking.
pub fn project(item: &OrderItem) -> OrderLineSummary {
    OrderLineSummary {
        product_name: item.product_name.clone(),
        quantity: item.quantity,
        total_price: Decimal::from(item.quantity).saturating_mul(item.unit_price),
    }
}

/// Project a whole order, keeping line order. A line whose total does not
/// fit in a `Decimal` is an error rather than a clamped price.
pub fn project_order(order: &Order) -> Result<OrderSummary> {
    let items = order
        .items
        .iter()
        .map(|item| {
            let total_price = line_total(item).ok_or_else(|| Error::PriceOverflow {
                order_id: order.order_id.clone(),
                product: item.product_name.clone(),
            })?;
            Ok(OrderLineSummary {
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                total_price,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(OrderSummary {
        order_id: order.order_id.clone(),
        customer_name: order.customer_name.clone(),
        email: order.email.clone(),
        status: order.status,
        order_date: order.order_date,
        items,
    })
}
