//! Orders export job: filters -> CSV -> stored file.

use chrono::Utc;

use crate::domain::job::ExportOrdersParams;
use crate::repository::{OrderListQuery, OrderReader};
use crate::services::storage::FileStorage;
use crate::worker::JobError;

/// Runs an export and returns the URL of the produced CSV.
///
/// One row per order line, the same orientation the back office had in its
/// spreadsheets: repeated order columns, one product per row. No prices.
pub fn run<R, S>(
    repo: &R,
    storage: &S,
    params: &serde_json::Value,
) -> Result<Option<String>, JobError>
where
    R: OrderReader + ?Sized,
    S: FileStorage + ?Sized,
{
    let filters: ExportOrdersParams = serde_json::from_value(params.clone())
        .map_err(|e| JobError::Fatal(format!("bad export params: {e}")))?;

    let mut query = OrderListQuery::new();
    if let Some(status) = filters.status {
        query = query.status(status);
    }
    if let Some(user_id) = filters.user_id {
        query = query.user(user_id);
    }
    if let Some(date_from) = filters.date_from {
        query = query.date_from(date_from);
    }
    if let Some(date_to) = filters.date_to {
        query = query.date_to(date_to);
    }

    let (_, rows) = repo
        .list_orders_with_users(query)
        .map_err(|e| JobError::Retryable(format!("failed to load orders: {e}")))?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "order_number",
            "status",
            "created_at",
            "customer_id",
            "username",
            "product_id",
            "product_name",
            "quantity",
        ])
        .map_err(|e| JobError::Fatal(format!("csv error: {e}")))?;

    for (order, customer) in &rows {
        for line in &order.lines {
            writer
                .write_record([
                    order.order.order_number.as_str(),
                    order.order.status.as_str(),
                    &order.order.created_at.to_string(),
                    &customer.id.to_string(),
                    customer.username.as_str(),
                    &line.product.id.to_string(),
                    line.product.name_uz.as_str(),
                    &line.quantity.to_string(),
                ])
                .map_err(|e| JobError::Fatal(format!("csv error: {e}")))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| JobError::Fatal(format!("csv error: {e}")))?;

    let filename = format!("orders_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
    let stored = storage
        .save_bytes(&bytes, &filename)
        .map_err(|e| JobError::Retryable(format!("storage error: {e}")))?;

    Ok(Some(stored.url))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::order::{Order, OrderLine, OrderStatus, OrderWithLines};
    use crate::domain::product::Product;
    use crate::domain::user::{Role, User, UserType};
    use crate::repository::mock::MockRepository;
    use crate::services::storage::LocalStorage;
    use serde_json::json;

    fn sample_rows() -> Vec<(OrderWithLines, User)> {
        let now = Utc::now().naive_utc();
        let product = Product {
            id: 3,
            name_uz: "Tovuq qanoti".into(),
            name_ru: "Крылья".into(),
            category_id: 1,
            supplier_id: 1,
            image_url: None,
            description: None,
            status: true,
            created_at: now,
        };
        let order = OrderWithLines {
            order: Order {
                id: 1,
                user_id: 9,
                order_number: "#20250610-001".into(),
                status: OrderStatus::Received,
                created_at: now,
                updated_at: now,
            },
            lines: vec![
                OrderLine {
                    product: product.clone(),
                    quantity: 1.5,
                },
                OrderLine {
                    product,
                    quantity: 3.0,
                },
            ],
        };
        let customer = User {
            id: 9,
            username: "aziz".into(),
            email: None,
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
            created_at: now,
        };
        vec![(order, customer)]
    }

    #[test]
    fn export_writes_one_row_per_line() {
        let mut repo = MockRepository::new();
        repo.expect_list_orders_with_users()
            .times(1)
            .withf(|query| query.status == Some(OrderStatus::Received))
            .returning(|_| Ok((1, sample_rows())));

        let dir = std::env::temp_dir().join(format!("parranda-export-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(&dir, "/media");

        let url = run(&repo, &storage, &json!({"status": "Received"}))
            .unwrap()
            .unwrap();
        assert!(url.contains("orders_"));

        let file = std::fs::read_dir(&dir).unwrap().next().unwrap().unwrap();
        let contents = std::fs::read_to_string(file.path()).unwrap();
        // Header plus two item rows; no price column anywhere.
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.contains("#20250610-001"));
        assert!(contents.contains("Tovuq qanoti"));
        assert!(!contents.contains("price"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn bad_params_are_fatal() {
        let repo = MockRepository::new();
        let storage = LocalStorage::new(std::env::temp_dir(), "/media");
        assert!(matches!(
            run(&repo, &storage, &json!({"status": "NotAStatus"})),
            Err(JobError::Fatal(_))
        ));
    }
}
