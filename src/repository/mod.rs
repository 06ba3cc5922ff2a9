use chrono::{NaiveDate, NaiveDateTime};

use crate::db::DbPool;
use crate::domain::cart::{CartKey, CartView};
use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::domain::job::{Job, NewJob};
use crate::domain::order::{Order, OrderStatus, OrderWithLines};
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::supplier::{NewSupplier, Supplier, UpdateSupplier};
use crate::domain::types::{JobId, Quantity};
use crate::domain::user::{NewUser, Role, UpdateProfile, User, UserType};
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub mod cart;
pub mod category;
pub mod errors;
pub mod job;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod order;
pub mod product;
pub mod supplier;
pub mod user;

/// Diesel-backed implementation of every repository trait in this module.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> RepositoryResult<crate::db::DbConnection> {
        self.pool.get().map_err(RepositoryError::from)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    pub category_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub status: Option<bool>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn supplier(mut self, supplier_id: i32) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    pub fn status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    pub status: Option<bool>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl CategoryListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SupplierListQuery {
    pub status: Option<bool>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl SupplierListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    pub user_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub role: Option<Role>,
    pub user_type: Option<UserType>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn user_type(mut self, user_type: UserType) -> Self {
        self.user_type = Some(user_type);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    /// Returns the user together with their password hash for login checks.
    fn get_credentials(&self, username: &str) -> RepositoryResult<Option<(User, String)>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    fn count_users_with_role(&self, role: Role) -> RepositoryResult<usize>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_profile(&self, user_id: i32, updates: &UpdateProfile) -> RepositoryResult<User>;
    fn set_user_role(&self, user_id: i32, role: Role) -> RepositoryResult<User>;
}

pub trait CategoryReader {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<(usize, Vec<Category>)>;
}

pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
    fn update_category(&self, id: i32, updates: &UpdateCategory) -> RepositoryResult<Category>;
    fn delete_category(&self, id: i32) -> RepositoryResult<()>;
    /// Fetch-or-create by Uzbek name, used by product imports.
    fn ensure_category_by_name(&self, name_uz: &str) -> RepositoryResult<Category>;
}

pub trait SupplierReader {
    fn get_supplier_by_id(&self, id: i32) -> RepositoryResult<Option<Supplier>>;
    fn list_suppliers(&self, query: SupplierListQuery) -> RepositoryResult<(usize, Vec<Supplier>)>;
}

pub trait SupplierWriter {
    fn create_supplier(&self, new_supplier: &NewSupplier) -> RepositoryResult<Supplier>;
    fn update_supplier(&self, id: i32, updates: &UpdateSupplier) -> RepositoryResult<Supplier>;
    fn delete_supplier(&self, id: i32) -> RepositoryResult<()>;
    fn ensure_supplier_by_name(&self, name: &str) -> RepositoryResult<Supplier>;
}

pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Products joined with their category and supplier for admin tables.
    fn list_products_with_refs(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<(Product, Category, Supplier)>)>;
    fn count_active_products(&self) -> RepositoryResult<usize>;
}

pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(&self, id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
    fn delete_product(&self, id: i32) -> RepositoryResult<()>;
    /// Import upsert keyed by the Uzbek name; returns `true` when created.
    fn upsert_product_by_name(&self, product: &NewProduct) -> RepositoryResult<(Product, bool)>;
}

pub trait CartReader {
    fn get_cart(&self, key: &CartKey) -> RepositoryResult<CartView>;
}

pub trait CartWriter {
    /// Sets the line quantity, replacing any previous value.
    fn set_cart_item(
        &self,
        key: &CartKey,
        product_id: i32,
        quantity: Quantity,
    ) -> RepositoryResult<()>;
    /// Adds to the line quantity, creating the line if missing.
    fn add_cart_item(
        &self,
        key: &CartKey,
        product_id: i32,
        quantity: Quantity,
    ) -> RepositoryResult<()>;
    fn remove_cart_item(&self, key: &CartKey, product_id: i32) -> RepositoryResult<()>;
    fn clear_cart(&self, key: &CartKey) -> RepositoryResult<()>;
    /// Folds an anonymous session cart into the user cart, quantities adding.
    fn merge_session_cart(&self, session_key: &str, user_id: i32) -> RepositoryResult<()>;
    /// Drops session carts whose TTL elapsed; returns how many were removed.
    fn delete_expired_session_carts(&self, now: NaiveDateTime) -> RepositoryResult<usize>;
}

pub trait OrderReader {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
    fn get_order_with_lines(&self, id: i32) -> RepositoryResult<Option<OrderWithLines>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<OrderWithLines>)>;
    /// Admin view: orders joined with the customer who placed them.
    fn list_orders_with_users(
        &self,
        query: OrderListQuery,
    ) -> RepositoryResult<(usize, Vec<(OrderWithLines, User)>)>;
    fn count_orders_created_on(&self, date: NaiveDate) -> RepositoryResult<usize>;
    fn count_orders_with_status(&self, status: OrderStatus) -> RepositoryResult<usize>;
}

pub trait OrderWriter {
    /// Turns the user's cart into an order atomically: allocates the day's
    /// next order number, snapshots the lines, empties the cart.
    fn place_order(&self, user_id: i32, today: NaiveDate) -> RepositoryResult<OrderWithLines>;
    /// Conditional transition; fails with `NotFound` when the order is no
    /// longer in `from` (another admin raced us).
    fn transition_order_status(
        &self,
        order_id: i32,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepositoryResult<Order>;
}

pub trait JobReader {
    fn get_job(&self, id: &JobId) -> RepositoryResult<Option<Job>>;
}

pub trait JobWriter {
    fn enqueue_job(&self, new_job: &NewJob) -> RepositoryResult<Job>;
    /// Atomically claims the oldest queued job, bumping its attempt counter.
    fn claim_next_job(&self, now: NaiveDateTime) -> RepositoryResult<Option<Job>>;
    fn finish_job_success(
        &self,
        id: &JobId,
        result_url: Option<&str>,
        now: NaiveDateTime,
    ) -> RepositoryResult<()>;
    fn finish_job_failed(&self, id: &JobId, error: &str, now: NaiveDateTime)
    -> RepositoryResult<()>;
    /// Puts a RUNNING job back in the queue after a retryable failure.
    fn requeue_job(&self, id: &JobId) -> RepositoryResult<()>;
    /// Requeues RUNNING jobs claimed before `cutoff`; jobs out of attempts
    /// are failed instead. Returns how many went back to the queue.
    fn recover_stale_jobs(
        &self,
        cutoff: NaiveDateTime,
        max_attempts: i32,
        now: NaiveDateTime,
    ) -> RepositoryResult<usize>;
}
