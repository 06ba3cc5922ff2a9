//! Admin panel flows for suppliers.

use validator::Validate;

use crate::domain::supplier::{NewSupplier, Supplier, UpdateSupplier};
use crate::dto::admin::{AdminSuppliersPageData, PanelQuery};
use crate::forms::suppliers::SupplierForm;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::errors::RepositoryError;
use crate::repository::{SupplierListQuery, SupplierReader, SupplierWriter};
use crate::services::{ServiceError, ServiceResult, ensure_admin};

pub fn load_panel<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PanelQuery,
) -> ServiceResult<AdminSuppliersPageData>
where
    R: SupplierReader + ?Sized,
{
    ensure_admin(user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = SupplierListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, items) = repo.list_suppliers(list_query)?;

    Ok(AdminSuppliersPageData {
        suppliers: Paginated::new(items, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search_query,
    })
}

pub fn create<R>(repo: &R, user: &AuthenticatedUser, form: &SupplierForm) -> ServiceResult<Supplier>
where
    R: SupplierWriter + ?Sized,
{
    ensure_admin(user)?;
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_supplier(&NewSupplier::from(form))
        .map_err(ServiceError::from)
}

pub fn update<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: &SupplierForm,
) -> ServiceResult<Supplier>
where
    R: SupplierWriter + ?Sized,
{
    ensure_admin(user)?;
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    match repo.update_supplier(id, &UpdateSupplier::from(form)) {
        Ok(supplier) => Ok(supplier),
        Err(RepositoryError::NotFound) => Err(ServiceError::NotFound),
        Err(err) => Err(ServiceError::from(err)),
    }
}

pub fn delete<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: SupplierWriter + ?Sized,
{
    ensure_admin(user)?;

    match repo.delete_supplier(id) {
        Ok(()) => Ok(()),
        Err(RepositoryError::ConstraintViolation(_)) => Err(ServiceError::Form(
            "supplier still has products and cannot be deleted".to_string(),
        )),
        Err(err) => Err(ServiceError::from(err)),
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::user::Role;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::authed;

    #[test]
    fn panel_requires_admin() {
        let repo = MockRepository::new();
        let customer = authed(1, Role::Customer);
        assert!(matches!(
            load_panel(&repo, &customer, PanelQuery::default()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn blank_name_is_rejected() {
        let repo = MockRepository::new();
        let admin = authed(1, Role::Admin);
        let form = SupplierForm {
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            status: true,
        };
        assert!(matches!(
            create(&repo, &admin, &form),
            Err(ServiceError::Form(_))
        ));
    }
}
