//! Repository implementation for orders and the order number sequence.

use std::collections::HashMap;

use chrono::{Days, NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::order::{
    Order, OrderLine, OrderStatus, OrderWithLines, format_order_number,
};
use crate::domain::user::User;
use crate::models::order::{
    NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
    OrderItem as DbOrderItem, OrderSequence,
};
use crate::models::product::Product as DbProduct;
use crate::models::user::User as DbUser;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, OrderListQuery, OrderReader, OrderWriter};

fn into_domain(db_order: DbOrder) -> RepositoryResult<Order> {
    Order::try_from(db_order).map_err(RepositoryError::from)
}

fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let end = date
        .checked_add_days(Days::new(1))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(start);
    (start, end)
}

/// Loads the lines of every order in `order_ids`, grouped per order.
fn load_lines(
    conn: &mut SqliteConnection,
    order_ids: &[i32],
) -> QueryResult<HashMap<i32, Vec<OrderLine>>> {
    use crate::schema::{order_items, products};

    let rows = order_items::table
        .inner_join(products::table)
        .filter(order_items::order_id.eq_any(order_ids))
        .order(order_items::id.asc())
        .load::<(DbOrderItem, DbProduct)>(conn)?;

    let mut grouped: HashMap<i32, Vec<OrderLine>> = HashMap::new();
    for (item, product) in rows {
        grouped.entry(item.order_id).or_default().push(OrderLine {
            product: product.into(),
            quantity: item.quantity,
        });
    }
    Ok(grouped)
}

fn apply_filters(
    query: &OrderListQuery,
) -> crate::schema::orders::BoxedQuery<'static, diesel::sqlite::Sqlite> {
    use crate::schema::orders;

    let mut q = orders::table.into_boxed();
    if let Some(user_id) = query.user_id {
        q = q.filter(orders::user_id.eq(user_id));
    }
    if let Some(status) = query.status {
        q = q.filter(orders::status.eq(status.as_str()));
    }
    if let Some(date_from) = query.date_from {
        let (start, _) = day_bounds(date_from);
        q = q.filter(orders::created_at.ge(start));
    }
    if let Some(date_to) = query.date_to {
        let (_, end) = day_bounds(date_to);
        q = q.filter(orders::created_at.lt(end));
    }
    q
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let order = orders::table
            .find(id)
            .first::<DbOrder>(&mut conn)
            .optional()?;

        order.map(into_domain).transpose()
    }

    fn get_order_with_lines(&self, id: i32) -> RepositoryResult<Option<OrderWithLines>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let Some(db_order) = orders::table
            .find(id)
            .first::<DbOrder>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let mut lines = load_lines(&mut conn, &[db_order.id])?;
        let order = into_domain(db_order)?;
        let lines = lines.remove(&order.id).unwrap_or_default();

        Ok(Some(OrderWithLines { order, lines }))
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<OrderWithLines>)> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let total: i64 = apply_filters(&query).count().get_result(&mut conn)?;

        let mut page_query = apply_filters(&query).order(orders::created_at.desc());
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            page_query = page_query.limit(per_page).offset((page - 1) * per_page);
        }
        let db_orders = page_query.load::<DbOrder>(&mut conn)?;

        let ids: Vec<i32> = db_orders.iter().map(|o| o.id).collect();
        let mut grouped = load_lines(&mut conn, &ids)?;

        let items = db_orders
            .into_iter()
            .map(|db_order| {
                let order = into_domain(db_order)?;
                let lines = grouped.remove(&order.id).unwrap_or_default();
                Ok(OrderWithLines { order, lines })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total as usize, items))
    }

    fn list_orders_with_users(
        &self,
        query: OrderListQuery,
    ) -> RepositoryResult<(usize, Vec<(OrderWithLines, User)>)> {
        use crate::schema::{orders, users};

        let mut conn = self.conn()?;

        let total: i64 = apply_filters(&query).count().get_result(&mut conn)?;

        // The user join is only needed on the rendered page, so the filter
        // set stays on the orders table and the page ids drive a second load.
        let mut page_query = apply_filters(&query).order(orders::created_at.desc());
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            page_query = page_query.limit(per_page).offset((page - 1) * per_page);
        }
        let db_orders = page_query.load::<DbOrder>(&mut conn)?;

        let ids: Vec<i32> = db_orders.iter().map(|o| o.id).collect();
        let mut grouped = load_lines(&mut conn, &ids)?;

        let user_ids: Vec<i32> = db_orders.iter().map(|o| o.user_id).collect();
        let customers: HashMap<i32, DbUser> = users::table
            .filter(users::id.eq_any(&user_ids))
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut items = Vec::with_capacity(db_orders.len());
        for db_order in db_orders {
            let Some(db_user) = customers.get(&db_order.user_id).cloned() else {
                return Err(RepositoryError::Unexpected(format!(
                    "order {} references missing user {}",
                    db_order.id, db_order.user_id
                )));
            };
            let order = into_domain(db_order)?;
            let lines = grouped.remove(&order.id).unwrap_or_default();
            let user = User::try_from(db_user).map_err(RepositoryError::from)?;
            items.push((OrderWithLines { order, lines }, user));
        }

        Ok((total as usize, items))
    }

    fn count_orders_created_on(&self, date: NaiveDate) -> RepositoryResult<usize> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let (start, end) = day_bounds(date);
        let total: i64 = orders::table
            .filter(orders::created_at.ge(start))
            .filter(orders::created_at.lt(end))
            .count()
            .get_result(&mut conn)?;

        Ok(total as usize)
    }

    fn count_orders_with_status(&self, status: OrderStatus) -> RepositoryResult<usize> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let total: i64 = orders::table
            .filter(orders::status.eq(status.as_str()))
            .count()
            .get_result(&mut conn)?;

        Ok(total as usize)
    }
}

impl OrderWriter for DieselRepository {
    fn place_order(&self, user_id: i32, today: NaiveDate) -> RepositoryResult<OrderWithLines> {
        use crate::schema::{cart_items, carts, order_items, order_sequences, orders, products};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<OrderWithLines, RepositoryError, _>(|conn| {
            let cart_id = carts::table
                .filter(carts::user_id.eq(user_id))
                .select(carts::id)
                .first::<i32>(conn)
                .optional()?;

            let items: Vec<(DbOrderItemSource, DbProduct)> = match cart_id {
                Some(cart_id) => cart_items::table
                    .inner_join(products::table)
                    .filter(cart_items::cart_id.eq(cart_id))
                    .order(cart_items::id.asc())
                    .select((
                        (cart_items::product_id, cart_items::quantity),
                        DbProduct::as_select(),
                    ))
                    .load(conn)?,
                None => Vec::new(),
            };

            if items.is_empty() {
                return Err(RepositoryError::ValidationError("cart is empty".to_string()));
            }

            let counter: i32 = diesel::insert_into(order_sequences::table)
                .values(&OrderSequence {
                    seq_date: today,
                    last_counter: 1,
                })
                .on_conflict(order_sequences::seq_date)
                .do_update()
                .set(order_sequences::last_counter.eq(order_sequences::last_counter + 1))
                .returning(order_sequences::last_counter)
                .get_result(conn)?;

            let order_number = format_order_number(today, counter);

            let db_order = diesel::insert_into(orders::table)
                .values(&DbNewOrder {
                    user_id,
                    order_number: &order_number,
                    status: OrderStatus::Received.as_str(),
                })
                .get_result::<DbOrder>(conn)?;

            let mut lines = Vec::with_capacity(items.len());
            for ((product_id, quantity), product) in items {
                diesel::insert_into(order_items::table)
                    .values(&DbNewOrderItem {
                        order_id: db_order.id,
                        product_id,
                        quantity,
                    })
                    .execute(conn)?;
                lines.push(OrderLine {
                    product: product.into(),
                    quantity,
                });
            }

            if let Some(cart_id) = cart_id {
                diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart_id)))
                    .execute(conn)?;
            }

            let order = into_domain(db_order)?;
            Ok(OrderWithLines { order, lines })
        })
    }

    fn transition_order_status(
        &self,
        order_id: i32,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepositoryResult<Order> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            orders::table
                .find(order_id)
                .filter(orders::status.eq(from.as_str())),
        )
        .set((
            orders::status.eq(to.as_str()),
            orders::updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .get_result::<DbOrder>(&mut conn)
        .optional()?;

        match updated {
            Some(db_order) => into_domain(db_order),
            None => Err(RepositoryError::NotFound),
        }
    }
}

type DbOrderItemSource = (i32, f64);
