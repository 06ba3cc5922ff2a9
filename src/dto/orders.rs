use crate::domain::order::OrderWithLines;
use crate::pagination::Paginated;

/// Query parameters accepted by the customer orders page.
#[derive(Debug, Default)]
pub struct OrdersQuery {
    pub page: Option<usize>,
}

/// Data required to render the customer's order history.
pub struct OrdersPageData {
    pub orders: Paginated<OrderWithLines>,
}

/// Data required to render one order with its fulfillment contact link.
pub struct OrderPageData {
    pub order: OrderWithLines,
    /// Prefilled, price-free message for the fulfillment operator.
    pub telegram_text: String,
    /// Deep link opening Telegram with the message above.
    pub telegram_link: String,
}
