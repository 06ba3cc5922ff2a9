//! Admin dashboard and user management.

use chrono::NaiveDate;

use crate::domain::order::OrderStatus;
use crate::domain::user::{Role, User, UserType};
use crate::dto::admin::{AdminSummary, AdminUsersPageData, AdminUsersQuery};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    OrderReader, ProductReader, UserListQuery, UserReader, UserWriter,
};
use crate::services::{ServiceError, ServiceResult, ensure_admin, ensure_superadmin};

/// Headline counters for the dashboard.
pub fn summary<R>(repo: &R, user: &AuthenticatedUser, today: NaiveDate) -> ServiceResult<AdminSummary>
where
    R: OrderReader + ProductReader + UserReader + ?Sized,
{
    ensure_admin(user)?;

    Ok(AdminSummary {
        today_orders: repo.count_orders_created_on(today)?,
        new_orders: repo.count_orders_with_status(OrderStatus::Received)?,
        total_products: repo.count_active_products()?,
        total_customers: repo.count_users_with_role(Role::Customer)?,
    })
}

/// User list with role/type filters and search. Superadmin only, like every
/// role-management surface.
pub fn list_users<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: AdminUsersQuery,
) -> ServiceResult<AdminUsersPageData>
where
    R: UserReader + ?Sized,
{
    ensure_superadmin(user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = UserListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(raw) = query.role.as_deref().filter(|s| !s.is_empty()) {
        list_query = list_query.role(
            Role::try_from(raw).map_err(|_| ServiceError::Form(format!("unknown role: {raw}")))?,
        );
    }
    if let Some(raw) = query.user_type.as_deref().filter(|s| !s.is_empty()) {
        list_query = list_query.user_type(
            UserType::try_from(raw)
                .map_err(|_| ServiceError::Form(format!("unknown user type: {raw}")))?,
        );
    }

    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, items) = repo.list_users(list_query)?;

    Ok(AdminUsersPageData {
        users: Paginated::new(items, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search_query,
    })
}

/// Changes a user's role. Guard rails: no self-changes, and the last
/// superadmin can never be demoted.
pub fn change_role<R>(
    repo: &R,
    actor: &AuthenticatedUser,
    target_id: i32,
    new_role: &str,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_superadmin(actor)?;

    let new_role = Role::try_from(new_role)
        .map_err(|_| ServiceError::Form(format!("invalid role: {new_role}")))?;

    let target = repo
        .get_user_by_id(target_id)?
        .ok_or(ServiceError::NotFound)?;

    if actor.user_id() == Some(target.id) {
        return Err(ServiceError::Form(
            "you cannot change your own role".to_string(),
        ));
    }

    if target.role.is_superadmin()
        && !new_role.is_superadmin()
        && repo.count_users_with_role(Role::Superadmin)? <= 1
    {
        return Err(ServiceError::Form(
            "cannot demote the last superadmin".to_string(),
        ));
    }

    repo.set_user_role(target.id, new_role).map_err(|err| {
        log::error!("Failed to change role of user {target_id}: {err}");
        ServiceError::from(err)
    })
}
