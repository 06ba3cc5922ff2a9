use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::domain::types::TypeConstraintError;

/// Fulfillment stage of an order. Transitions are admin-driven and strictly
/// forward: Received -> Confirmed -> Shipped.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Received,
    Confirmed,
    Shipped,
}

impl OrderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Received => "Received",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
        }
    }

    /// The single legal successor, if any.
    pub const fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Received => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => None,
        }
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.next() == Some(target)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Received" => Ok(OrderStatus::Received),
            "Confirmed" => Ok(OrderStatus::Confirmed),
            "Shipped" => Ok(OrderStatus::Shipped),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub order_number: String,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Order line joined with its product snapshot.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct OrderLine {
    pub product: Product,
    pub quantity: f64,
}

/// An order together with its lines, the unit the UI and exports work with.
#[derive(Clone, Debug, Serialize)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

/// Formats the public order number for the day's sequence slot:
/// `#YYYYMMDD-NNN`.
pub fn format_order_number(date: NaiveDate, counter: i32) -> String {
    format!("#{}-{counter:03}", date.format("%Y%m%d"))
}
