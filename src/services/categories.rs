//! Admin panel flows for categories.

use validator::Validate;

use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::dto::admin::{AdminCategoriesPageData, PanelQuery};
use crate::forms::categories::CategoryForm;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::errors::RepositoryError;
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter};
use crate::services::{ServiceError, ServiceResult, ensure_admin};

pub fn load_panel<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PanelQuery,
) -> ServiceResult<AdminCategoriesPageData>
where
    R: CategoryReader + ?Sized,
{
    ensure_admin(user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = CategoryListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, items) = repo.list_categories(list_query)?;

    Ok(AdminCategoriesPageData {
        categories: Paginated::new(items, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search_query,
    })
}

pub fn create<R>(repo: &R, user: &AuthenticatedUser, form: &CategoryForm) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    ensure_admin(user)?;
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_category(&NewCategory::from(form))
        .map_err(ServiceError::from)
}

pub fn update<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: &CategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    ensure_admin(user)?;
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    match repo.update_category(id, &UpdateCategory::from(form)) {
        Ok(category) => Ok(category),
        Err(RepositoryError::NotFound) => Err(ServiceError::NotFound),
        Err(err) => Err(ServiceError::from(err)),
    }
}

pub fn delete<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    ensure_admin(user)?;

    match repo.delete_category(id) {
        Ok(()) => Ok(()),
        Err(RepositoryError::ConstraintViolation(_)) => Err(ServiceError::Form(
            "category still has products and cannot be deleted".to_string(),
        )),
        Err(err) => Err(ServiceError::from(err)),
    }
}
