//! Order placement, history, re-ordering and admin status transitions.

use chrono::NaiveDate;

use crate::domain::cart::{CartKey, CartView};
use crate::domain::order::{Order, OrderStatus, OrderWithLines};
use crate::domain::types::Quantity;
use crate::dto::admin::{AdminOrderRow, AdminOrdersPageData, AdminOrdersQuery};
use crate::dto::orders::{OrderPageData, OrdersPageData, OrdersQuery};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::errors::RepositoryError;
use crate::repository::{
    CartReader, CartWriter, OrderListQuery, OrderReader, OrderWriter,
};
use crate::services::{
    ServiceError, ServiceResult, ensure_admin, ensure_customer, telegram,
};

/// Turns the customer's cart into an order. The cart is emptied; the caller
/// gets the order back for the confirmation page.
pub fn checkout<R>(repo: &R, user: &AuthenticatedUser, today: NaiveDate) -> ServiceResult<OrderWithLines>
where
    R: OrderWriter + ?Sized,
{
    ensure_customer(user)?;
    let user_id = user.user_id().ok_or(ServiceError::Unauthorized)?;

    match repo.place_order(user_id, today) {
        Ok(order) => Ok(order),
        Err(RepositoryError::ValidationError(_)) => {
            Err(ServiceError::Form("your cart is empty".to_string()))
        }
        Err(err) => {
            log::error!("Failed to place order: {err}");
            Err(ServiceError::from(err))
        }
    }
}

/// The customer's own order history, newest first.
pub fn my_orders<R>(repo: &R, user: &AuthenticatedUser, query: OrdersQuery) -> ServiceResult<OrdersPageData>
where
    R: OrderReader + ?Sized,
{
    ensure_customer(user)?;
    let user_id = user.user_id().ok_or(ServiceError::Unauthorized)?;

    let page = query.page.unwrap_or(1);
    let (total, items) = repo.list_orders(
        OrderListQuery::new()
            .user(user_id)
            .paginate(page, DEFAULT_ITEMS_PER_PAGE),
    )?;

    Ok(OrdersPageData {
        orders: Paginated::new(items, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
    })
}

/// One order with its Telegram handoff link. Owners see their own orders;
/// admins see everything.
pub fn order_detail<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
) -> ServiceResult<OrderPageData>
where
    R: OrderReader + ?Sized,
{
    let order = repo
        .get_order_with_lines(order_id)?
        .ok_or(ServiceError::NotFound)?;

    let user_id = user.user_id().ok_or(ServiceError::Unauthorized)?;
    if order.order.user_id != user_id && !user.role.is_admin() {
        return Err(ServiceError::Unauthorized);
    }

    let telegram_text = telegram::customer_message(&order);
    let telegram_link = telegram::share_link(&telegram_text);

    Ok(OrderPageData {
        order,
        telegram_text,
        telegram_link,
    })
}

/// Clones a past order's lines back into the cart; quantities add up when
/// the product is already there.
pub fn reorder<R>(repo: &R, user: &AuthenticatedUser, order_id: i32) -> ServiceResult<CartView>
where
    R: OrderReader + CartReader + CartWriter + ?Sized,
{
    ensure_customer(user)?;
    let user_id = user.user_id().ok_or(ServiceError::Unauthorized)?;

    let order = repo
        .get_order_with_lines(order_id)?
        .ok_or(ServiceError::NotFound)?;
    if order.order.user_id != user_id {
        return Err(ServiceError::Unauthorized);
    }

    let key = CartKey::User(user_id);
    for line in &order.lines {
        let quantity = Quantity::new(line.quantity)?;
        repo.add_cart_item(&key, line.product.id, quantity)?;
    }

    repo.get_cart(&key).map_err(ServiceError::from)
}

/// Admin order board with filters.
pub fn admin_orders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: AdminOrdersQuery,
) -> ServiceResult<AdminOrdersPageData>
where
    R: OrderReader + ?Sized,
{
    ensure_admin(user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = OrderListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let status_filter = query.status.filter(|s| !s.is_empty());
    if let Some(raw) = &status_filter {
        list_query = list_query.status(OrderStatus::try_from(raw.as_str())?);
    }
    if let Some(user_id) = query.user_id {
        list_query = list_query.user(user_id);
    }
    if let Some(raw) = query.date_from.as_deref().filter(|s| !s.is_empty()) {
        list_query = list_query.date_from(parse_date(raw)?);
    }
    if let Some(raw) = query.date_to.as_deref().filter(|s| !s.is_empty()) {
        list_query = list_query.date_to(parse_date(raw)?);
    }

    let (total, rows) = repo.list_orders_with_users(list_query)?;
    let rows = rows
        .into_iter()
        .map(|(order, customer)| AdminOrderRow { order, customer })
        .collect();

    Ok(AdminOrdersPageData {
        orders: Paginated::new(rows, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        status_filter,
    })
}

pub(crate) fn parse_date(raw: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ServiceError::Form(format!("invalid date: {raw}")))
}

/// Advances an order along Received -> Confirmed -> Shipped. Anything else
/// is rejected before touching the database.
pub fn advance_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
    target: &str,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    ensure_admin(user)?;

    let target = OrderStatus::try_from(target)
        .map_err(|_| ServiceError::Form(format!("invalid status: {target}")))?;

    let order = repo.get_order_by_id(order_id)?.ok_or(ServiceError::NotFound)?;
    if !order.status.can_transition_to(target) {
        return Err(ServiceError::Form(format!(
            "illegal transition from {} to {}",
            order.status, target
        )));
    }

    match repo.transition_order_status(order_id, order.status, target) {
        Ok(order) => Ok(order),
        // Someone advanced it between our read and write.
        Err(RepositoryError::NotFound) => Err(ServiceError::Form(
            "order was updated by someone else, reload the page".to_string(),
        )),
        Err(err) => Err(ServiceError::from(err)),
    }
}

/// Admin contact card for the customer behind an order.
pub fn telegram_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
) -> ServiceResult<crate::dto::api::TelegramContactResponse>
where
    R: OrderReader + crate::repository::UserReader + ?Sized,
{
    ensure_admin(user)?;

    let order = repo
        .get_order_with_lines(order_id)?
        .ok_or(ServiceError::NotFound)?;
    let customer = repo
        .get_user_by_id(order.order.user_id)?
        .ok_or(ServiceError::NotFound)?;

    Ok(telegram::contact_card(&order, &customer))
}
