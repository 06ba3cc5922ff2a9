//! Mock repository implementation for isolating services in tests.

use chrono::{NaiveDate, NaiveDateTime};
use mockall::mock;

use crate::domain::cart::{CartKey, CartView};
use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::domain::job::{Job, NewJob};
use crate::domain::order::{Order, OrderStatus, OrderWithLines};
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::supplier::{NewSupplier, Supplier, UpdateSupplier};
use crate::domain::types::{JobId, Quantity};
use crate::domain::user::{NewUser, Role, UpdateProfile, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CartReader, CartWriter, CategoryListQuery, CategoryReader, CategoryWriter, JobReader,
    JobWriter, OrderListQuery, OrderReader, OrderWriter, ProductListQuery, ProductReader,
    ProductWriter, SupplierListQuery, SupplierReader, SupplierWriter, UserListQuery, UserReader,
    UserWriter,
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
        fn get_credentials(&self, username: &str) -> RepositoryResult<Option<(User, String)>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
        fn count_users_with_role(&self, role: Role) -> RepositoryResult<usize>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_profile(&self, user_id: i32, updates: &UpdateProfile) -> RepositoryResult<User>;
        fn set_user_role(&self, user_id: i32, role: Role) -> RepositoryResult<User>;
    }

    impl CategoryReader for Repository {
        fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
        fn list_categories(
            &self,
            query: CategoryListQuery,
        ) -> RepositoryResult<(usize, Vec<Category>)>;
    }

    impl CategoryWriter for Repository {
        fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
        fn update_category(&self, id: i32, updates: &UpdateCategory) -> RepositoryResult<Category>;
        fn delete_category(&self, id: i32) -> RepositoryResult<()>;
        fn ensure_category_by_name(&self, name_uz: &str) -> RepositoryResult<Category>;
    }

    impl SupplierReader for Repository {
        fn get_supplier_by_id(&self, id: i32) -> RepositoryResult<Option<Supplier>>;
        fn list_suppliers(
            &self,
            query: SupplierListQuery,
        ) -> RepositoryResult<(usize, Vec<Supplier>)>;
    }

    impl SupplierWriter for Repository {
        fn create_supplier(&self, new_supplier: &NewSupplier) -> RepositoryResult<Supplier>;
        fn update_supplier(&self, id: i32, updates: &UpdateSupplier) -> RepositoryResult<Supplier>;
        fn delete_supplier(&self, id: i32) -> RepositoryResult<()>;
        fn ensure_supplier_by_name(&self, name: &str) -> RepositoryResult<Supplier>;
    }

    impl ProductReader for Repository {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
        fn list_products_with_refs(
            &self,
            query: ProductListQuery,
        ) -> RepositoryResult<(usize, Vec<(Product, Category, Supplier)>)>;
        fn count_active_products(&self) -> RepositoryResult<usize>;
    }

    impl ProductWriter for Repository {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, id: i32) -> RepositoryResult<()>;
        fn upsert_product_by_name(&self, product: &NewProduct) -> RepositoryResult<(Product, bool)>;
    }

    impl CartReader for Repository {
        fn get_cart(&self, key: &CartKey) -> RepositoryResult<CartView>;
    }

    impl CartWriter for Repository {
        fn set_cart_item(
            &self,
            key: &CartKey,
            product_id: i32,
            quantity: Quantity,
        ) -> RepositoryResult<()>;
        fn add_cart_item(
            &self,
            key: &CartKey,
            product_id: i32,
            quantity: Quantity,
        ) -> RepositoryResult<()>;
        fn remove_cart_item(&self, key: &CartKey, product_id: i32) -> RepositoryResult<()>;
        fn clear_cart(&self, key: &CartKey) -> RepositoryResult<()>;
        fn merge_session_cart(&self, session_key: &str, user_id: i32) -> RepositoryResult<()>;
        fn delete_expired_session_carts(&self, now: NaiveDateTime) -> RepositoryResult<usize>;
    }

    impl OrderReader for Repository {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
        fn get_order_with_lines(&self, id: i32) -> RepositoryResult<Option<OrderWithLines>>;
        fn list_orders(
            &self,
            query: OrderListQuery,
        ) -> RepositoryResult<(usize, Vec<OrderWithLines>)>;
        fn list_orders_with_users(
            &self,
            query: OrderListQuery,
        ) -> RepositoryResult<(usize, Vec<(OrderWithLines, User)>)>;
        fn count_orders_created_on(&self, date: NaiveDate) -> RepositoryResult<usize>;
        fn count_orders_with_status(&self, status: OrderStatus) -> RepositoryResult<usize>;
    }

    impl OrderWriter for Repository {
        fn place_order(&self, user_id: i32, today: NaiveDate) -> RepositoryResult<OrderWithLines>;
        fn transition_order_status(
            &self,
            order_id: i32,
            from: OrderStatus,
            to: OrderStatus,
        ) -> RepositoryResult<Order>;
    }

    impl JobReader for Repository {
        fn get_job(&self, id: &JobId) -> RepositoryResult<Option<Job>>;
    }

    impl JobWriter for Repository {
        fn enqueue_job(&self, new_job: &NewJob) -> RepositoryResult<Job>;
        fn claim_next_job(&self, now: NaiveDateTime) -> RepositoryResult<Option<Job>>;
        fn finish_job_success<'a>(
            &self,
            id: &JobId,
            result_url: Option<&'a str>,
            now: NaiveDateTime,
        ) -> RepositoryResult<()>;
        fn finish_job_failed(
            &self,
            id: &JobId,
            error: &str,
            now: NaiveDateTime,
        ) -> RepositoryResult<()>;
        fn requeue_job(&self, id: &JobId) -> RepositoryResult<()>;
        fn recover_stale_jobs(
            &self,
            cutoff: NaiveDateTime,
            max_attempts: i32,
            now: NaiveDateTime,
        ) -> RepositoryResult<usize>;
    }
}
