use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::carts)]
/// Cart owned by an authenticated customer.
pub struct Cart {
    pub id: i32,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::carts)]
pub struct NewCart {
    pub user_id: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(table_name = crate::schema::cart_items)]
#[diesel(belongs_to(Cart, foreign_key = cart_id))]
pub struct CartItem {
    pub id: i32,
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct NewCartItem {
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: f64,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::session_carts)]
/// Cart keyed by an anonymous visitor's session.
pub struct SessionCart {
    pub id: i32,
    pub session_key: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::session_carts)]
pub struct NewSessionCart<'a> {
    pub session_key: &'a str,
    pub expires_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(table_name = crate::schema::session_cart_items)]
#[diesel(belongs_to(SessionCart, foreign_key = cart_id))]
pub struct SessionCartItem {
    pub id: i32,
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::session_cart_items)]
pub struct NewSessionCartItem {
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: f64,
}
