//! Repository implementation for user and session carts.

use chrono::{Days, NaiveDateTime};
use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::domain::cart::{CartKey, CartLine, CartView};
use crate::domain::types::Quantity;
use crate::models::cart::{
    CartItem as DbCartItem, NewCart, NewCartItem, NewSessionCart, NewSessionCartItem,
    SessionCartItem as DbSessionCartItem,
};
use crate::models::product::Product as DbProduct;
use crate::repository::errors::RepositoryResult;
use crate::repository::{CartReader, CartWriter, DieselRepository};

/// Anonymous carts are kept for a week, then reaped by the worker.
pub const SESSION_CART_TTL_DAYS: u64 = 7;

fn find_user_cart_id(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<Option<i32>> {
    use crate::schema::carts;

    carts::table
        .filter(carts::user_id.eq(user_id))
        .select(carts::id)
        .first::<i32>(conn)
        .optional()
}

fn ensure_user_cart_id(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<i32> {
    use crate::schema::carts;

    if let Some(id) = find_user_cart_id(conn, user_id)? {
        return Ok(id);
    }
    diesel::insert_into(carts::table)
        .values(&NewCart { user_id })
        .returning(carts::id)
        .get_result::<i32>(conn)
}

fn find_session_cart_id(conn: &mut SqliteConnection, session_key: &str) -> QueryResult<Option<i32>> {
    use crate::schema::session_carts;

    session_carts::table
        .filter(session_carts::session_key.eq(session_key))
        .select(session_carts::id)
        .first::<i32>(conn)
        .optional()
}

fn ensure_session_cart_id(conn: &mut SqliteConnection, session_key: &str) -> QueryResult<i32> {
    use crate::schema::session_carts;

    if let Some(id) = find_session_cart_id(conn, session_key)? {
        return Ok(id);
    }
    let now = chrono::Utc::now().naive_utc();
    let expires_at = now
        .checked_add_days(Days::new(SESSION_CART_TTL_DAYS))
        .unwrap_or(now);
    diesel::insert_into(session_carts::table)
        .values(&NewSessionCart {
            session_key,
            expires_at,
        })
        .returning(session_carts::id)
        .get_result::<i32>(conn)
}

impl CartReader for DieselRepository {
    fn get_cart(&self, key: &CartKey) -> RepositoryResult<CartView> {
        use crate::schema::{cart_items, products, session_cart_items};

        let mut conn = self.conn()?;

        let lines = match key {
            CartKey::User(user_id) => {
                let Some(cart_id) = find_user_cart_id(&mut conn, *user_id)? else {
                    return Ok(CartView::default());
                };
                cart_items::table
                    .inner_join(products::table)
                    .filter(cart_items::cart_id.eq(cart_id))
                    .order(cart_items::id.asc())
                    .load::<(DbCartItem, DbProduct)>(&mut conn)?
                    .into_iter()
                    .map(|(item, product)| CartLine {
                        product: product.into(),
                        quantity: item.quantity,
                    })
                    .collect()
            }
            CartKey::Session(session_key) => {
                let Some(cart_id) = find_session_cart_id(&mut conn, session_key)? else {
                    return Ok(CartView::default());
                };
                session_cart_items::table
                    .inner_join(products::table)
                    .filter(session_cart_items::cart_id.eq(cart_id))
                    .order(session_cart_items::id.asc())
                    .load::<(DbSessionCartItem, DbProduct)>(&mut conn)?
                    .into_iter()
                    .map(|(item, product)| CartLine {
                        product: product.into(),
                        quantity: item.quantity,
                    })
                    .collect()
            }
        };

        Ok(CartView { lines })
    }
}

impl CartWriter for DieselRepository {
    fn set_cart_item(
        &self,
        key: &CartKey,
        product_id: i32,
        quantity: Quantity,
    ) -> RepositoryResult<()> {
        use crate::schema::{cart_items, session_cart_items};

        let mut conn = self.conn()?;
        match key {
            CartKey::User(user_id) => {
                let cart_id = ensure_user_cart_id(&mut conn, *user_id)?;
                diesel::insert_into(cart_items::table)
                    .values(&NewCartItem {
                        cart_id,
                        product_id,
                        quantity: quantity.get(),
                    })
                    .on_conflict((cart_items::cart_id, cart_items::product_id))
                    .do_update()
                    .set(cart_items::quantity.eq(excluded(cart_items::quantity)))
                    .execute(&mut conn)?;
            }
            CartKey::Session(session_key) => {
                let cart_id = ensure_session_cart_id(&mut conn, session_key)?;
                diesel::insert_into(session_cart_items::table)
                    .values(&NewSessionCartItem {
                        cart_id,
                        product_id,
                        quantity: quantity.get(),
                    })
                    .on_conflict((
                        session_cart_items::cart_id,
                        session_cart_items::product_id,
                    ))
                    .do_update()
                    .set(session_cart_items::quantity.eq(excluded(session_cart_items::quantity)))
                    .execute(&mut conn)?;
            }
        }
        Ok(())
    }

    fn add_cart_item(
        &self,
        key: &CartKey,
        product_id: i32,
        quantity: Quantity,
    ) -> RepositoryResult<()> {
        use crate::schema::{cart_items, session_cart_items};

        let mut conn = self.conn()?;
        match key {
            CartKey::User(user_id) => {
                let cart_id = ensure_user_cart_id(&mut conn, *user_id)?;
                diesel::insert_into(cart_items::table)
                    .values(&NewCartItem {
                        cart_id,
                        product_id,
                        quantity: quantity.get(),
                    })
                    .on_conflict((cart_items::cart_id, cart_items::product_id))
                    .do_update()
                    .set(
                        cart_items::quantity
                            .eq(cart_items::quantity + excluded(cart_items::quantity)),
                    )
                    .execute(&mut conn)?;
            }
            CartKey::Session(session_key) => {
                let cart_id = ensure_session_cart_id(&mut conn, session_key)?;
                diesel::insert_into(session_cart_items::table)
                    .values(&NewSessionCartItem {
                        cart_id,
                        product_id,
                        quantity: quantity.get(),
                    })
                    .on_conflict((
                        session_cart_items::cart_id,
                        session_cart_items::product_id,
                    ))
                    .do_update()
                    .set(
                        session_cart_items::quantity
                            .eq(session_cart_items::quantity
                                + excluded(session_cart_items::quantity)),
                    )
                    .execute(&mut conn)?;
            }
        }
        Ok(())
    }

    fn remove_cart_item(&self, key: &CartKey, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::{cart_items, session_cart_items};

        let mut conn = self.conn()?;
        match key {
            CartKey::User(user_id) => {
                if let Some(cart_id) = find_user_cart_id(&mut conn, *user_id)? {
                    diesel::delete(
                        cart_items::table
                            .filter(cart_items::cart_id.eq(cart_id))
                            .filter(cart_items::product_id.eq(product_id)),
                    )
                    .execute(&mut conn)?;
                }
            }
            CartKey::Session(session_key) => {
                if let Some(cart_id) = find_session_cart_id(&mut conn, session_key)? {
                    diesel::delete(
                        session_cart_items::table
                            .filter(session_cart_items::cart_id.eq(cart_id))
                            .filter(session_cart_items::product_id.eq(product_id)),
                    )
                    .execute(&mut conn)?;
                }
            }
        }
        Ok(())
    }

    fn clear_cart(&self, key: &CartKey) -> RepositoryResult<()> {
        use crate::schema::{cart_items, session_cart_items};

        let mut conn = self.conn()?;
        match key {
            CartKey::User(user_id) => {
                if let Some(cart_id) = find_user_cart_id(&mut conn, *user_id)? {
                    diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart_id)))
                        .execute(&mut conn)?;
                }
            }
            CartKey::Session(session_key) => {
                if let Some(cart_id) = find_session_cart_id(&mut conn, session_key)? {
                    diesel::delete(
                        session_cart_items::table
                            .filter(session_cart_items::cart_id.eq(cart_id)),
                    )
                    .execute(&mut conn)?;
                }
            }
        }
        Ok(())
    }

    fn merge_session_cart(&self, session_key: &str, user_id: i32) -> RepositoryResult<()> {
        use crate::schema::{cart_items, session_cart_items};

        let mut conn = self.conn()?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let Some(session_cart_id) = find_session_cart_id(conn, session_key)? else {
                return Ok(());
            };

            let items = session_cart_items::table
                .filter(session_cart_items::cart_id.eq(session_cart_id))
                .load::<DbSessionCartItem>(conn)?;

            if !items.is_empty() {
                let cart_id = ensure_user_cart_id(conn, user_id)?;
                for item in &items {
                    diesel::insert_into(cart_items::table)
                        .values(&NewCartItem {
                            cart_id,
                            product_id: item.product_id,
                            quantity: item.quantity,
                        })
                        .on_conflict((cart_items::cart_id, cart_items::product_id))
                        .do_update()
                        .set(
                            cart_items::quantity
                                .eq(cart_items::quantity + excluded(cart_items::quantity)),
                        )
                        .execute(conn)?;
                }
            }

            diesel::delete(
                session_cart_items::table
                    .filter(session_cart_items::cart_id.eq(session_cart_id)),
            )
            .execute(conn)?;

            Ok(())
        })?;

        Ok(())
    }

    fn delete_expired_session_carts(&self, now: NaiveDateTime) -> RepositoryResult<usize> {
        use crate::schema::session_carts;

        let mut conn = self.conn()?;
        // Items go with their cart via ON DELETE CASCADE.
        let removed =
            diesel::delete(session_carts::table.filter(session_carts::expires_at.lt(now)))
                .execute(&mut conn)?;

        Ok(removed)
    }
}
