use serde::Serialize;

use crate::domain::product::Product;

/// One line of a cart joined with its product for display.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: f64,
}

/// A resolved cart for whoever is shopping right now.
///
/// Anonymous visitors get a session cart keyed by the cookie session;
/// authenticated customers get their user cart (with any session cart
/// already merged in).
#[derive(Clone, Debug, Serialize, Default)]
pub struct CartView {
    pub lines: Vec<CartLine>,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_quantity(&self) -> f64 {
        let total: f64 = self.lines.iter().map(|line| line.quantity).sum();
        (total * 100.0).round() / 100.0
    }
}

/// Identity a cart is resolved against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartKey {
    /// Authenticated customer id.
    User(i32),
    /// Opaque session key issued to an anonymous visitor.
    Session(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: i32) -> Product {
        Product {
            id,
            name_uz: format!("Mahsulot {id}"),
            name_ru: format!("Продукт {id}"),
            category_id: 1,
            supplier_id: 1,
            image_url: None,
            description: None,
            status: true,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn total_quantity_sums_lines() {
        let view = CartView {
            lines: vec![
                CartLine {
                    product: product(1),
                    quantity: 1.5,
                },
                CartLine {
                    product: product(2),
                    quantity: 0.25,
                },
            ],
        };
        assert_eq!(view.total_quantity(), 1.75);
        assert!(!view.is_empty());
        assert!(CartView::default().is_empty());
    }
}
