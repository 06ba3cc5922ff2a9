//! Storefront pages: home and product browsing.

use crate::dto::main::{HomePageData, ProductsPageData, ProductsQuery};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CategoryListQuery, CategoryReader, ProductListQuery, ProductReader};
use crate::services::ServiceResult;

/// Number of products shown on the landing page grid.
const FEATURED_COUNT: usize = 8;

pub fn load_home<R>(repo: &R) -> ServiceResult<HomePageData>
where
    R: CategoryReader + ProductReader + ?Sized,
{
    let (_, categories) = repo.list_categories(CategoryListQuery::new().status(true))?;
    let (_, featured) =
        repo.list_products(ProductListQuery::new().status(true).paginate(1, FEATURED_COUNT))?;

    Ok(HomePageData {
        categories,
        featured,
    })
}

pub fn load_products_page<R>(repo: &R, query: ProductsQuery) -> ServiceResult<ProductsPageData>
where
    R: CategoryReader + ProductReader + ?Sized,
{
    let (_, categories) = repo.list_categories(CategoryListQuery::new().status(true))?;

    let page = query.page.unwrap_or(1);
    let mut list_query = ProductListQuery::new()
        .status(true)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(category_id) = query.category {
        list_query = list_query.category(category_id);
    }

    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, items) = repo.list_products(list_query)?;
    let products = Paginated::new(items, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE));

    Ok(ProductsPageData {
        categories,
        products,
        selected_category: query.category,
        search_query,
    })
}
