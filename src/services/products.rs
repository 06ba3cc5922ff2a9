//! Admin panel flows for products.

use validator::Validate;

use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::dto::admin::{AdminProductRow, AdminProductsPageData, PanelQuery};
use crate::forms::products::ProductForm;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::errors::RepositoryError;
use crate::repository::{
    CategoryListQuery, CategoryReader, ProductListQuery, ProductReader, ProductWriter,
    SupplierListQuery, SupplierReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_admin};

pub fn load_panel<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PanelQuery,
) -> ServiceResult<AdminProductsPageData>
where
    R: ProductReader + CategoryReader + SupplierReader + ?Sized,
{
    ensure_admin(user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = ProductListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, rows) = repo.list_products_with_refs(list_query)?;
    let rows = rows
        .into_iter()
        .map(|(product, category, supplier)| AdminProductRow {
            product,
            category,
            supplier,
        })
        .collect();

    let (_, categories) = repo.list_categories(CategoryListQuery::new())?;
    let (_, suppliers) = repo.list_suppliers(SupplierListQuery::new())?;

    Ok(AdminProductsPageData {
        products: Paginated::new(rows, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        categories,
        suppliers,
        search_query,
    })
}

/// Creating a product checks its category and supplier actually exist, so a
/// stale form select does not surface as a bare constraint violation.
pub fn create<R>(repo: &R, user: &AuthenticatedUser, form: &ProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + CategoryReader + SupplierReader + ?Sized,
{
    ensure_admin(user)?;
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    check_refs(repo, form)?;

    repo.create_product(&NewProduct::from(form))
        .map_err(ServiceError::from)
}

pub fn update<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: &ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + CategoryReader + SupplierReader + ?Sized,
{
    ensure_admin(user)?;
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    check_refs(repo, form)?;

    match repo.update_product(id, &UpdateProduct::from(form)) {
        Ok(product) => Ok(product),
        Err(RepositoryError::NotFound) => Err(ServiceError::NotFound),
        Err(err) => Err(ServiceError::from(err)),
    }
}

pub fn delete<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    ensure_admin(user)?;

    match repo.delete_product(id) {
        Ok(()) => Ok(()),
        Err(RepositoryError::ConstraintViolation(_)) => Err(ServiceError::Form(
            "product appears in existing orders and cannot be deleted".to_string(),
        )),
        Err(err) => Err(ServiceError::from(err)),
    }
}

fn check_refs<R>(repo: &R, form: &ProductForm) -> ServiceResult<()>
where
    R: CategoryReader + SupplierReader + ?Sized,
{
    if repo.get_category_by_id(form.category_id)?.is_none() {
        return Err(ServiceError::Form("unknown category".to_string()));
    }
    if repo.get_supplier_by_id(form.supplier_id)?.is_none() {
        return Err(ServiceError::Form("unknown supplier".to_string()));
    }
    Ok(())
}
