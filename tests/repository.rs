use chrono::{Days, NaiveDate, Utc};

use parranda_market::domain::cart::CartKey;
use parranda_market::domain::category::{NewCategory, UpdateCategory};
use parranda_market::domain::job::{JobStatus, JobType, NewJob};
use parranda_market::domain::order::OrderStatus;
use parranda_market::domain::product::NewProduct;
use parranda_market::domain::supplier::NewSupplier;
use parranda_market::domain::types::Quantity;
use parranda_market::domain::user::{NewUser, Role, UpdateProfile, UserType};
use parranda_market::repository::{
    CartReader, CartWriter, CategoryListQuery, CategoryReader, CategoryWriter, DieselRepository,
    JobReader, JobWriter, OrderListQuery, OrderReader, OrderWriter, ProductListQuery,
    ProductReader, ProductWriter, SupplierReader, SupplierWriter, UserListQuery, UserReader,
    UserWriter,
};
use serde_json::json;

mod common;

fn seed_user(repo: &DieselRepository, username: &str, role: Role) -> i32 {
    let new_user = NewUser {
        username: username.to_string(),
        email: Some(format!("{username}@example.com")),
        password_hash: "fake-hash".to_string(),
        role,
        user_type: UserType::Individual,
        fio: Some("Test User".to_string()),
        phone: Some("+998901234567".to_string()),
        address: Some("Tashkent".to_string()),
        company_name: None,
        inn: None,
        bank_details: None,
        legal_address: None,
        responsible_person: None,
    };
    repo.create_user(&new_user).unwrap().id
}

fn seed_product(repo: &DieselRepository, name_uz: &str) -> i32 {
    let category = repo.ensure_category_by_name("Go'sht").unwrap();
    let supplier = repo.ensure_supplier_by_name("Parranda Farm").unwrap();
    let new_product = NewProduct::new(
        name_uz.to_string(),
        format!("{name_uz} (ru)"),
        category.id,
        supplier.id,
        None,
        None,
        true,
    );
    repo.create_product(&new_product).unwrap().id
}

fn quantity(value: f64) -> Quantity {
    Quantity::new(value).unwrap()
}

#[test]
fn test_user_repository_roundtrip() {
    let test_db = common::TestDb::new("test_user_repository.db");
    let repo = test_db.repo();

    let id = seed_user(&repo, "aziz", Role::Customer);

    let user = repo.get_user_by_id(id).unwrap().unwrap();
    assert_eq!(user.username, "aziz");
    assert_eq!(user.role, Role::Customer);

    let (by_name, hash) = repo.get_credentials("aziz").unwrap().unwrap();
    assert_eq!(by_name.id, id);
    assert_eq!(hash, "fake-hash");
    assert!(repo.get_credentials("ghost").unwrap().is_none());

    let updates = UpdateProfile {
        fio: Some("Aziz Karimov".to_string()),
        phone: None,
        ..Default::default()
    };
    let updated = repo.update_profile(id, &updates).unwrap();
    assert_eq!(updated.fio.as_deref(), Some("Aziz Karimov"));
    // treat_none_as_null: the omitted phone is cleared.
    assert_eq!(updated.phone, None);

    let promoted = repo.set_user_role(id, Role::Admin).unwrap();
    assert_eq!(promoted.role, Role::Admin);
    assert_eq!(repo.count_users_with_role(Role::Admin).unwrap(), 1);
    assert_eq!(repo.count_users_with_role(Role::Customer).unwrap(), 0);
}

#[test]
fn test_user_list_filters_and_search() {
    let test_db = common::TestDb::new("test_user_list.db");
    let repo = test_db.repo();

    seed_user(&repo, "aziz", Role::Customer);
    seed_user(&repo, "madina", Role::Admin);
    seed_user(&repo, "umid", Role::Customer);

    let (total, _) = repo.list_users(UserListQuery::new()).unwrap();
    assert_eq!(total, 3);

    let (customers, items) = repo.list_users(UserListQuery::new().role(Role::Customer)).unwrap();
    assert_eq!(customers, 2);
    assert_eq!(items.len(), 2);

    let (found, items) = repo.list_users(UserListQuery::new().search("madi")).unwrap();
    assert_eq!(found, 1);
    assert_eq!(items[0].username, "madina");

    let (paged_total, page) = repo
        .list_users(UserListQuery::new().paginate(1, 2))
        .unwrap();
    assert_eq!(paged_total, 3);
    assert_eq!(page.len(), 2);
}

#[test]
fn test_category_repository_crud() {
    let test_db = common::TestDb::new("test_category_crud.db");
    let repo = test_db.repo();

    let created = repo
        .create_category(&NewCategory::new("File".into(), "Филе".into(), 1, true))
        .unwrap();

    let fetched = repo.get_category_by_id(created.id).unwrap().unwrap();
    assert_eq!(fetched.name_uz, "File");

    let updated = repo
        .update_category(
            created.id,
            &UpdateCategory {
                name_uz: "Filelar".into(),
                name_ru: "Филе".into(),
                sort_order: 5,
                status: false,
            },
        )
        .unwrap();
    assert_eq!(updated.name_uz, "Filelar");
    assert!(!updated.status);

    let (active_total, _) = repo
        .list_categories(CategoryListQuery::new().status(true))
        .unwrap();
    assert_eq!(active_total, 0);

    // ensure_by_name creates on miss and reuses on hit.
    let ensured = repo.ensure_category_by_name("Qanot").unwrap();
    let again = repo.ensure_category_by_name("Qanot").unwrap();
    assert_eq!(ensured.id, again.id);
    assert_eq!(ensured.name_ru, "Qanot");

    repo.delete_category(created.id).unwrap();
    assert!(repo.get_category_by_id(created.id).unwrap().is_none());
}

#[test]
fn test_product_repository_crud_and_search() {
    let test_db = common::TestDb::new("test_product_crud.db");
    let repo = test_db.repo();

    let id = seed_product(&repo, "Tovuq filesi");
    seed_product(&repo, "Tovuq qanoti");

    let (total, _) = repo.list_products(ProductListQuery::new()).unwrap();
    assert_eq!(total, 2);

    let (found, items) = repo
        .list_products(ProductListQuery::new().search("files"))
        .unwrap();
    assert_eq!(found, 1);
    assert_eq!(items[0].name_uz, "Tovuq filesi");

    let (with_refs_total, rows) = repo
        .list_products_with_refs(ProductListQuery::new())
        .unwrap();
    assert_eq!(with_refs_total, 2);
    assert_eq!(rows[0].1.name_uz, "Go'sht");
    assert_eq!(rows[0].2.name, "Parranda Farm");

    // Upsert by Uzbek name updates in place.
    let category = repo.ensure_category_by_name("Go'sht").unwrap();
    let supplier = repo.ensure_supplier_by_name("Parranda Farm").unwrap();
    let (updated, created) = repo
        .upsert_product_by_name(&NewProduct::new(
            "Tovuq filesi".into(),
            "Куриное филе".into(),
            category.id,
            supplier.id,
            None,
            Some("yangi tavsif".into()),
            false,
        ))
        .unwrap();
    assert!(!created);
    assert_eq!(updated.id, id);
    assert!(!updated.status);
    assert_eq!(repo.count_active_products().unwrap(), 1);

    let (_, fresh_created) = repo
        .upsert_product_by_name(&NewProduct::new(
            "Tovuq soni".into(),
            "Бедра".into(),
            category.id,
            supplier.id,
            None,
            None,
            true,
        ))
        .unwrap();
    assert!(fresh_created);

    repo.delete_product(id).unwrap();
    assert!(repo.get_product_by_id(id).unwrap().is_none());
}

#[test]
fn test_supplier_repository_crud() {
    let test_db = common::TestDb::new("test_supplier_crud.db");
    let repo = test_db.repo();

    let created = repo
        .create_supplier(&NewSupplier::new(
            "Ferma A".into(),
            Some("+998712000000".into()),
            None,
            true,
        ))
        .unwrap();
    assert_eq!(created.phone.as_deref(), Some("+998712000000"));

    let ensured = repo.ensure_supplier_by_name("Ferma A").unwrap();
    assert_eq!(ensured.id, created.id);

    repo.delete_supplier(created.id).unwrap();
    assert!(repo.get_supplier_by_id(created.id).unwrap().is_none());
}

#[test]
fn test_cart_set_add_remove() {
    let test_db = common::TestDb::new("test_cart_ops.db");
    let repo = test_db.repo();

    let product_id = seed_product(&repo, "Tovuq filesi");
    let key = CartKey::Session("sess-1".to_string());

    repo.set_cart_item(&key, product_id, quantity(1.5)).unwrap();
    repo.set_cart_item(&key, product_id, quantity(2.0)).unwrap();
    let cart = repo.get_cart(&key).unwrap();
    assert_eq!(cart.lines.len(), 1);
    // set replaces, it does not accumulate.
    assert_eq!(cart.lines[0].quantity, 2.0);

    repo.add_cart_item(&key, product_id, quantity(0.5)).unwrap();
    let cart = repo.get_cart(&key).unwrap();
    assert_eq!(cart.lines[0].quantity, 2.5);

    repo.remove_cart_item(&key, product_id).unwrap();
    assert!(repo.get_cart(&key).unwrap().is_empty());

    // Unknown carts read as empty and removals are no-ops.
    let ghost = CartKey::User(999);
    assert!(repo.get_cart(&ghost).unwrap().is_empty());
    repo.remove_cart_item(&ghost, product_id).unwrap();
}

#[test]
fn test_session_cart_merges_into_user_cart() {
    let test_db = common::TestDb::new("test_cart_merge.db");
    let repo = test_db.repo();

    let product_a = seed_product(&repo, "Tovuq filesi");
    let product_b = seed_product(&repo, "Tovuq qanoti");
    let user_id = seed_user(&repo, "aziz", Role::Customer);

    let session = CartKey::Session("sess-merge".to_string());
    let user_key = CartKey::User(user_id);

    repo.set_cart_item(&session, product_a, quantity(1.0)).unwrap();
    repo.set_cart_item(&session, product_b, quantity(2.0)).unwrap();
    repo.set_cart_item(&user_key, product_a, quantity(0.5)).unwrap();

    repo.merge_session_cart("sess-merge", user_id).unwrap();

    let cart = repo.get_cart(&user_key).unwrap();
    assert_eq!(cart.lines.len(), 2);
    let line_a = cart
        .lines
        .iter()
        .find(|line| line.product.id == product_a)
        .unwrap();
    // Quantities add on merge.
    assert_eq!(line_a.quantity, 1.5);

    // The session cart is emptied, and merging again changes nothing.
    assert!(repo.get_cart(&session).unwrap().is_empty());
    repo.merge_session_cart("sess-merge", user_id).unwrap();
    assert_eq!(repo.get_cart(&user_key).unwrap().lines.len(), 2);
}

#[test]
fn test_expired_session_carts_are_reaped() {
    let test_db = common::TestDb::new("test_cart_expiry.db");
    let repo = test_db.repo();

    let product_id = seed_product(&repo, "Tovuq filesi");
    let key = CartKey::Session("sess-old".to_string());
    repo.set_cart_item(&key, product_id, quantity(1.0)).unwrap();

    let now = Utc::now().naive_utc();
    assert_eq!(repo.delete_expired_session_carts(now).unwrap(), 0);

    // Eight days later the 7-day TTL has elapsed.
    let later = now.checked_add_days(Days::new(8)).unwrap();
    assert_eq!(repo.delete_expired_session_carts(later).unwrap(), 1);
    assert!(repo.get_cart(&key).unwrap().is_empty());
}

#[test]
fn test_place_order_allocates_numbers_and_empties_cart() {
    let test_db = common::TestDb::new("test_place_order.db");
    let repo = test_db.repo();

    let product_id = seed_product(&repo, "Tovuq filesi");
    let user_id = seed_user(&repo, "aziz", Role::Customer);
    let key = CartKey::User(user_id);
    let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

    // Empty cart cannot become an order.
    assert!(repo.place_order(user_id, today).is_err());

    repo.set_cart_item(&key, product_id, quantity(2.5)).unwrap();
    let first = repo.place_order(user_id, today).unwrap();
    assert_eq!(first.order.order_number, "#20250610-001");
    assert_eq!(first.order.status, OrderStatus::Received);
    assert_eq!(first.lines.len(), 1);
    assert_eq!(first.lines[0].quantity, 2.5);
    assert!(repo.get_cart(&key).unwrap().is_empty());

    repo.set_cart_item(&key, product_id, quantity(1.0)).unwrap();
    let second = repo.place_order(user_id, today).unwrap();
    assert_eq!(second.order.order_number, "#20250610-002");

    // A new day restarts the counter.
    let tomorrow = today.succ_opt().unwrap();
    repo.set_cart_item(&key, product_id, quantity(1.0)).unwrap();
    let third = repo.place_order(user_id, tomorrow).unwrap();
    assert_eq!(third.order.order_number, "#20250611-001");
}

#[test]
fn test_order_listing_and_counts() {
    let test_db = common::TestDb::new("test_order_listing.db");
    let repo = test_db.repo();

    let product_id = seed_product(&repo, "Tovuq filesi");
    let user_a = seed_user(&repo, "aziz", Role::Customer);
    let user_b = seed_user(&repo, "umid", Role::Customer);
    let today = Utc::now().date_naive();

    for user_id in [user_a, user_a, user_b] {
        repo.set_cart_item(&CartKey::User(user_id), product_id, quantity(1.0))
            .unwrap();
        repo.place_order(user_id, today).unwrap();
    }

    let (total, _) = repo.list_orders(OrderListQuery::new()).unwrap();
    assert_eq!(total, 3);

    let (for_a, orders_a) = repo.list_orders(OrderListQuery::new().user(user_a)).unwrap();
    assert_eq!(for_a, 2);
    assert!(orders_a.iter().all(|o| o.order.user_id == user_a));
    assert!(orders_a.iter().all(|o| o.lines.len() == 1));

    let (with_users_total, rows) = repo
        .list_orders_with_users(OrderListQuery::new().user(user_b))
        .unwrap();
    assert_eq!(with_users_total, 1);
    assert_eq!(rows[0].1.username, "umid");

    assert_eq!(repo.count_orders_created_on(today).unwrap(), 3);
    assert_eq!(
        repo.count_orders_with_status(OrderStatus::Received).unwrap(),
        3
    );
}

#[test]
fn test_status_transition_is_conditional() {
    let test_db = common::TestDb::new("test_status_transition.db");
    let repo = test_db.repo();

    let product_id = seed_product(&repo, "Tovuq filesi");
    let user_id = seed_user(&repo, "aziz", Role::Customer);
    repo.set_cart_item(&CartKey::User(user_id), product_id, quantity(1.0))
        .unwrap();
    let placed = repo.place_order(user_id, Utc::now().date_naive()).unwrap();

    let confirmed = repo
        .transition_order_status(placed.order.id, OrderStatus::Received, OrderStatus::Confirmed)
        .unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);

    // The same conditional transition no longer matches.
    assert!(
        repo.transition_order_status(
            placed.order.id,
            OrderStatus::Received,
            OrderStatus::Confirmed
        )
        .is_err()
    );

    let shipped = repo
        .transition_order_status(placed.order.id, OrderStatus::Confirmed, OrderStatus::Shipped)
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);
}

#[test]
fn test_job_queue_claim_and_finish() {
    let test_db = common::TestDb::new("test_job_queue.db");
    let repo = test_db.repo();
    let now = Utc::now().naive_utc();

    let queued = repo
        .enqueue_job(&NewJob::new(JobType::ExportOrders, json!({})))
        .unwrap();
    assert_eq!(queued.status, JobStatus::Pending);
    assert_eq!(queued.attempts, 0);

    let claimed = repo.claim_next_job(now).unwrap().unwrap();
    assert_eq!(claimed.id, queued.id);
    assert_eq!(claimed.status, JobStatus::Running);
    assert_eq!(claimed.attempts, 1);

    // Nothing left to claim while the job is running.
    assert!(repo.claim_next_job(now).unwrap().is_none());

    repo.finish_job_success(&claimed.id, Some("/media/orders.csv"), now)
        .unwrap();
    let finished = repo.get_job(&claimed.id).unwrap().unwrap();
    assert_eq!(finished.status, JobStatus::Success);
    assert_eq!(finished.result_url.as_deref(), Some("/media/orders.csv"));
    assert!(finished.finished_at.is_some());
}

#[test]
fn test_job_queue_failure_and_requeue() {
    let test_db = common::TestDb::new("test_job_failure.db");
    let repo = test_db.repo();
    let now = Utc::now().naive_utc();

    let queued = repo
        .enqueue_job(&NewJob::new(JobType::ImportProducts, json!({"file": "x"})))
        .unwrap();

    let claimed = repo.claim_next_job(now).unwrap().unwrap();
    repo.requeue_job(&claimed.id).unwrap();

    // A requeued job is claimable again with a bumped attempt counter.
    let reclaimed = repo.claim_next_job(now).unwrap().unwrap();
    assert_eq!(reclaimed.id, queued.id);
    assert_eq!(reclaimed.attempts, 2);

    repo.finish_job_failed(&reclaimed.id, "invalid header", now)
        .unwrap();
    let failed = repo.get_job(&reclaimed.id).unwrap().unwrap();
    assert_eq!(failed.status, JobStatus::Failed);
    assert_eq!(failed.error.as_deref(), Some("invalid header"));
}

#[test]
fn test_stale_running_jobs_are_recovered() {
    let test_db = common::TestDb::new("test_job_recovery.db");
    let repo = test_db.repo();
    let now = Utc::now().naive_utc();

    let queued = repo
        .enqueue_job(&NewJob::new(JobType::ExportOrders, json!({})))
        .unwrap();
    let claimed = repo.claim_next_job(now).unwrap().unwrap();
    assert_eq!(claimed.id, queued.id);

    // A cutoff in the future makes the claim look stale.
    let cutoff = now.checked_add_days(Days::new(1)).unwrap();
    let requeued = repo.recover_stale_jobs(cutoff, 3, now).unwrap();
    assert_eq!(requeued, 1);
    assert_eq!(
        repo.get_job(&queued.id).unwrap().unwrap().status,
        JobStatus::Pending
    );

    // Out of attempts it fails instead.
    repo.claim_next_job(now).unwrap().unwrap(); // attempts = 2
    repo.recover_stale_jobs(cutoff, 3, now).unwrap();
    repo.claim_next_job(now).unwrap().unwrap(); // attempts = 3
    let requeued = repo.recover_stale_jobs(cutoff, 3, now).unwrap();
    assert_eq!(requeued, 0);
    let failed = repo.get_job(&queued.id).unwrap().unwrap();
    assert_eq!(failed.status, JobStatus::Failed);
    assert_eq!(failed.error.as_deref(), Some("worker timed out"));
}
