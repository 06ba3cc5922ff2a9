use crate::domain::category::Category;
use crate::domain::product::Product;
use crate::pagination::Paginated;

/// Query parameters accepted by the storefront products page.
#[derive(Debug, Default)]
pub struct ProductsQuery {
    pub category: Option<i32>,
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the home page.
pub struct HomePageData {
    /// Active categories in menu order.
    pub categories: Vec<Category>,
    /// A handful of active products for the hero grid.
    pub featured: Vec<Product>,
}

/// Data required to render the products listing.
pub struct ProductsPageData {
    pub categories: Vec<Category>,
    pub products: Paginated<Product>,
    pub selected_category: Option<i32>,
    pub search_query: Option<String>,
}
