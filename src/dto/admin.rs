use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::order::OrderWithLines;
use crate::domain::product::Product;
use crate::domain::supplier::Supplier;
use crate::domain::user::User;
use crate::pagination::Paginated;

/// Headline counters on the admin dashboard.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AdminSummary {
    pub today_orders: usize,
    pub new_orders: usize,
    pub total_products: usize,
    pub total_customers: usize,
}

/// One row of the admin orders table.
#[derive(Debug, Serialize)]
pub struct AdminOrderRow {
    #[serde(flatten)]
    pub order: OrderWithLines,
    pub customer: User,
}

/// Query parameters accepted by the admin orders page.
#[derive(Debug, Default)]
pub struct AdminOrdersQuery {
    pub status: Option<String>,
    pub user_id: Option<i32>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<usize>,
}

pub struct AdminOrdersPageData {
    pub orders: Paginated<AdminOrderRow>,
    pub status_filter: Option<String>,
}

/// One row of the admin products table.
#[derive(Debug, Serialize)]
pub struct AdminProductRow {
    pub product: Product,
    pub category: Category,
    pub supplier: Supplier,
}

pub struct AdminProductsPageData {
    pub products: Paginated<AdminProductRow>,
    /// All categories/suppliers for the edit form selects.
    pub categories: Vec<Category>,
    pub suppliers: Vec<Supplier>,
    pub search_query: Option<String>,
}

pub struct AdminCategoriesPageData {
    pub categories: Paginated<Category>,
    pub search_query: Option<String>,
}

pub struct AdminSuppliersPageData {
    pub suppliers: Paginated<Supplier>,
    pub search_query: Option<String>,
}

/// Query parameters accepted by the admin users page.
#[derive(Debug, Default)]
pub struct AdminUsersQuery {
    pub role: Option<String>,
    pub user_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
}

pub struct AdminUsersPageData {
    pub users: Paginated<User>,
    pub search_query: Option<String>,
}

/// Generic paginated list query used by the catalog panels.
#[derive(Debug, Default)]
pub struct PanelQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}
