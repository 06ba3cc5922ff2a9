//! End-to-end job worker tests over a real database and local storage.

use chrono::Utc;
use serde_json::json;

use parranda_market::domain::cart::CartKey;
use parranda_market::domain::job::{JobStatus, JobType, NewJob};
use parranda_market::domain::product::NewProduct;
use parranda_market::domain::types::Quantity;
use parranda_market::domain::user::{NewUser, Role, UserType};
use parranda_market::repository::{
    CartWriter, CategoryWriter, DieselRepository, JobReader, JobWriter, OrderWriter,
    ProductReader, ProductListQuery, ProductWriter, SupplierWriter, UserWriter,
};
use parranda_market::services::storage::{FileStorage, LocalStorage};
use parranda_market::worker::process_next;

mod common;

struct TestStorage {
    storage: LocalStorage,
    dir: std::path::PathBuf,
}

impl TestStorage {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("{name}-{}", uuid::Uuid::new_v4()));
        Self {
            storage: LocalStorage::new(&dir, "/media"),
            dir,
        }
    }
}

impl Drop for TestStorage {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

fn seed_order(repo: &DieselRepository) {
    let category = repo.ensure_category_by_name("Go'sht").unwrap();
    let supplier = repo.ensure_supplier_by_name("Parranda Farm").unwrap();
    let product = repo
        .create_product(&NewProduct::new(
            "Tovuq filesi".into(),
            "Куриное филе".into(),
            category.id,
            supplier.id,
            None,
            None,
            true,
        ))
        .unwrap();

    let user = repo
        .create_user(&NewUser {
            username: "aziz".into(),
            email: None,
            password_hash: "hash".into(),
            role: Role::Customer,
            user_type: UserType::Individual,
            fio: None,
            phone: None,
            address: None,
            company_name: None,
            inn: None,
            bank_details: None,
            legal_address: None,
            responsible_person: None,
        })
        .unwrap();

    repo.set_cart_item(
        &CartKey::User(user.id),
        product.id,
        Quantity::new(2.5).unwrap(),
    )
    .unwrap();
    repo.place_order(user.id, Utc::now().date_naive()).unwrap();
}

#[test]
fn test_export_job_end_to_end() {
    let test_db = common::TestDb::new("test_worker_export.db");
    let repo = test_db.repo();
    let storage = TestStorage::new("parranda-worker-export");

    seed_order(&repo);

    let job = repo
        .enqueue_job(&NewJob::new(JobType::ExportOrders, json!({})))
        .unwrap();

    assert!(process_next(&repo, &storage.storage).unwrap());
    // Queue drained.
    assert!(!process_next(&repo, &storage.storage).unwrap());

    let finished = repo.get_job(&job.id).unwrap().unwrap();
    assert_eq!(finished.status, JobStatus::Success);

    let url = finished.result_url.unwrap();
    let filename = url.rsplit('/').next().unwrap();
    let contents = std::fs::read_to_string(storage.dir.join(filename)).unwrap();
    assert!(contents.starts_with("order_number,status,created_at"));
    assert!(contents.contains("Tovuq filesi"));
    assert!(contents.contains("aziz"));
}

#[test]
fn test_import_job_end_to_end() {
    let test_db = common::TestDb::new("test_worker_import.db");
    let repo = test_db.repo();
    let storage = TestStorage::new("parranda-worker-import");

    let csv = "\
name_uz,name_ru,category,supplier,image_url,description,status
Tovuq filesi,Куриное филе,File,Ferma A,,,true
,Без имени,File,Ferma A,,,true
";
    let upload = storage.storage.save_bytes(csv.as_bytes(), "upload.csv").unwrap();

    let job = repo
        .enqueue_job(&NewJob::new(
            JobType::ImportProducts,
            json!({"file": upload.path.to_string_lossy()}),
        ))
        .unwrap();

    assert!(process_next(&repo, &storage.storage).unwrap());

    let finished = repo.get_job(&job.id).unwrap().unwrap();
    assert_eq!(finished.status, JobStatus::Success);
    assert!(finished.result_url.is_some());

    // The valid row landed in the catalog with its category auto-created.
    let (total, products) = repo.list_products(ProductListQuery::new()).unwrap();
    assert_eq!(total, 1);
    assert_eq!(products[0].name_uz, "Tovuq filesi");

    // The report accounts for the skipped row.
    let report_url = finished.result_url.unwrap();
    let report_name = report_url.rsplit('/').next().unwrap();
    let report = std::fs::read_to_string(storage.dir.join(report_name)).unwrap();
    assert!(report.contains("created=1 updated=0 skipped=1"));
}

#[test]
fn test_import_job_with_bad_header_fails() {
    let test_db = common::TestDb::new("test_worker_bad_header.db");
    let repo = test_db.repo();
    let storage = TestStorage::new("parranda-worker-bad-header");

    let upload = storage
        .storage
        .save_bytes(b"name,price\nTovuq,100\n", "upload.csv")
        .unwrap();

    let job = repo
        .enqueue_job(&NewJob::new(
            JobType::ImportProducts,
            json!({"file": upload.path.to_string_lossy()}),
        ))
        .unwrap();

    assert!(process_next(&repo, &storage.storage).unwrap());

    let finished = repo.get_job(&job.id).unwrap().unwrap();
    assert_eq!(finished.status, JobStatus::Failed);
    assert!(finished.error.unwrap().contains("invalid header"));
}

#[test]
fn test_missing_upload_retries_then_fails() {
    let test_db = common::TestDb::new("test_worker_retries.db");
    let repo = test_db.repo();
    let storage = TestStorage::new("parranda-worker-retries");

    let job = repo
        .enqueue_job(&NewJob::new(
            JobType::ImportProducts,
            json!({"file": "/nonexistent/upload.csv"}),
        ))
        .unwrap();

    // Attempts 1 and 2 requeue, attempt 3 fails for good.
    for _ in 0..3 {
        assert!(process_next(&repo, &storage.storage).unwrap());
    }

    let finished = repo.get_job(&job.id).unwrap().unwrap();
    assert_eq!(finished.status, JobStatus::Failed);
    assert_eq!(finished.attempts, 3);
    assert!(finished.error.unwrap().contains("failed to read upload"));
}
