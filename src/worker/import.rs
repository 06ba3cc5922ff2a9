//! Product import job: uploaded CSV -> upserted catalog + summary report.

use std::path::Path;

use crate::domain::product::NewProduct;
use crate::repository::{CategoryWriter, ProductWriter, SupplierWriter};
use crate::services::jobs::IMPORT_HEADER;
use crate::services::storage::FileStorage;
use crate::worker::JobError;

/// Normalizes a status cell into a strict boolean.
///
/// Accepted: "true"/"false" and "1"/"0", case-insensitive, trimmed.
pub fn parse_status_cell(raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err("invalid status; must be true/false or 1/0".to_string()),
    }
}

struct RowOutcome {
    row: usize,
    action: &'static str,
    message: String,
    errors: Vec<String>,
}

/// Runs an import and returns the URL of the summary report.
///
/// Rows with validation problems are skipped and listed in the report;
/// well-formed rows upsert by Uzbek name, auto-creating categories and
/// suppliers referenced by name.
pub fn run<R, S>(
    repo: &R,
    storage: &S,
    params: &serde_json::Value,
) -> Result<Option<String>, JobError>
where
    R: ProductWriter + CategoryWriter + SupplierWriter + ?Sized,
    S: FileStorage + ?Sized,
{
    let Some(file) = params.get("file").and_then(|v| v.as_str()) else {
        return Err(JobError::Fatal("import params missing file path".to_string()));
    };

    let bytes = storage
        .read_bytes(Path::new(file))
        .map_err(|e| JobError::Retryable(format!("failed to read upload: {e}")))?;

    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let headers = reader
        .headers()
        .map_err(|e| JobError::Fatal(format!("unreadable header: {e}")))?
        .clone();
    if headers.iter().ne(IMPORT_HEADER.iter().copied()) {
        return Err(JobError::Fatal(format!(
            "invalid header. expected {:?}, got {:?}",
            IMPORT_HEADER.join(","),
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut outcomes: Vec<RowOutcome> = Vec::new();
    let (mut created, mut updated, mut skipped) = (0usize, 0usize, 0usize);

    for (idx, record) in reader.records().enumerate() {
        let row = idx + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                skipped += 1;
                outcomes.push(RowOutcome {
                    row,
                    action: "skipped",
                    message: "Unparseable row".to_string(),
                    errors: vec![e.to_string()],
                });
                continue;
            }
        };

        let cell = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        let name_uz = cell(0);
        let name_ru = cell(1);
        let category_name = cell(2);
        let supplier_name = cell(3);
        let image_url = cell(4);
        let description = cell(5);
        let status_raw = cell(6);

        let mut errors = Vec::new();
        let status = match parse_status_cell(&status_raw) {
            Ok(status) => status,
            Err(e) => {
                errors.push(e);
                false
            }
        };
        if name_uz.is_empty() {
            errors.push("name_uz required".to_string());
        }
        if name_ru.is_empty() {
            errors.push("name_ru required".to_string());
        }
        if category_name.is_empty() {
            errors.push("category required".to_string());
        }
        if supplier_name.is_empty() {
            errors.push("supplier required".to_string());
        }

        if !errors.is_empty() {
            skipped += 1;
            outcomes.push(RowOutcome {
                row,
                action: "skipped",
                message: "Validation errors".to_string(),
                errors,
            });
            continue;
        }

        let category = repo
            .ensure_category_by_name(&category_name)
            .map_err(|e| JobError::Retryable(format!("row {row}: {e}")))?;
        let supplier = repo
            .ensure_supplier_by_name(&supplier_name)
            .map_err(|e| JobError::Retryable(format!("row {row}: {e}")))?;

        let new_product = NewProduct::new(
            name_uz,
            name_ru,
            category.id,
            supplier.id,
            Some(image_url).filter(|s| !s.is_empty()),
            Some(description).filter(|s| !s.is_empty()),
            status,
        );

        let (product, was_created) = repo
            .upsert_product_by_name(&new_product)
            .map_err(|e| JobError::Retryable(format!("row {row}: {e}")))?;

        if was_created {
            created += 1;
            outcomes.push(RowOutcome {
                row,
                action: "created",
                message: format!("Product {}", product.id),
                errors: Vec::new(),
            });
        } else {
            updated += 1;
            outcomes.push(RowOutcome {
                row,
                action: "updated",
                message: format!("Product {}", product.id),
                errors: Vec::new(),
            });
        }
    }

    let report = build_report(&outcomes, created, updated, skipped)
        .map_err(|e| JobError::Fatal(format!("csv error: {e}")))?;

    let stored = storage
        .save_bytes(&report, "import_products_summary.csv")
        .map_err(|e| JobError::Retryable(format!("storage error: {e}")))?;

    Ok(Some(stored.url))
}

fn build_report(
    outcomes: &[RowOutcome],
    created: usize,
    updated: usize,
    skipped: usize,
) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["row", "action", "message", "errors"])?;
    for outcome in outcomes {
        writer.write_record([
            outcome.row.to_string().as_str(),
            outcome.action,
            outcome.message.as_str(),
            outcome.errors.join("; ").as_str(),
        ])?;
    }
    writer.write_record([
        "totals",
        "",
        &format!("created={created} updated={updated} skipped={skipped}"),
        "",
    ])?;
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn status_cell_parsing() {
        assert_eq!(parse_status_cell("true"), Ok(true));
        assert_eq!(parse_status_cell(" TRUE "), Ok(true));
        assert_eq!(parse_status_cell("1"), Ok(true));
        assert_eq!(parse_status_cell("false"), Ok(false));
        assert_eq!(parse_status_cell("0"), Ok(false));
        assert!(parse_status_cell("yes").is_err());
        assert!(parse_status_cell("").is_err());
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::domain::product::Product;
    use crate::domain::supplier::Supplier;
    use crate::repository::mock::MockRepository;
    use crate::services::storage::LocalStorage;
    use chrono::Utc;
    use serde_json::json;

    fn storage_with(content: &str) -> (LocalStorage, std::path::PathBuf, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("parranda-import-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(&dir, "/media");
        let stored = storage.save_bytes(content.as_bytes(), "upload.csv").unwrap();
        (storage, dir, stored.path)
    }

    fn expect_catalog(repo: &mut MockRepository) {
        repo.expect_ensure_category_by_name().returning(|name| {
            Ok(Category {
                id: 1,
                name_uz: name.to_string(),
                name_ru: name.to_string(),
                sort_order: 0,
                status: true,
                created_at: Utc::now().naive_utc(),
            })
        });
        repo.expect_ensure_supplier_by_name().returning(|name| {
            Ok(Supplier {
                id: 2,
                name: name.to_string(),
                phone: None,
                address: None,
                status: true,
                created_at: Utc::now().naive_utc(),
            })
        });
    }

    #[test]
    fn wrong_header_is_fatal() {
        let repo = MockRepository::new();
        let (storage, dir, path) = storage_with("name,price\nTovuq,100\n");

        let result = run(
            &repo,
            &storage,
            &json!({"file": path.to_string_lossy()}),
        );
        assert!(matches!(result, Err(JobError::Fatal(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn valid_rows_upsert_and_bad_rows_skip() {
        let mut repo = MockRepository::new();
        expect_catalog(&mut repo);
        repo.expect_upsert_product_by_name()
            .times(2)
            .returning(|new_product| {
                let created = new_product.name_uz == "Tovuq filesi";
                Ok((
                    Product {
                        id: if created { 10 } else { 11 },
                        name_uz: new_product.name_uz.clone(),
                        name_ru: new_product.name_ru.clone(),
                        category_id: new_product.category_id,
                        supplier_id: new_product.supplier_id,
                        image_url: new_product.image_url.clone(),
                        description: new_product.description.clone(),
                        status: new_product.status,
                        created_at: Utc::now().naive_utc(),
                    },
                    created,
                ))
            });

        let csv = "\
name_uz,name_ru,category,supplier,image_url,description,status
Tovuq filesi,Куриное филе,File,Parranda Farm,,,true
Tovuq soni,Куриные бедра,Son,Parranda Farm,,,0
,Без имени,File,Parranda Farm,,,true
Tovuq qanoti,Крылья,File,Parranda Farm,,,maybe
";
        let (storage, dir, path) = storage_with(csv);

        let url = run(
            &repo,
            &storage,
            &json!({"file": path.to_string_lossy()}),
        )
        .unwrap()
        .unwrap();
        assert!(url.contains("import_products_summary"));

        let report_path = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(Result::ok)
            .find(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .contains("import_products_summary")
            })
            .unwrap()
            .path();
        let report = std::fs::read_to_string(report_path).unwrap();
        assert!(report.contains("created=1 updated=1 skipped=2"));
        assert!(report.contains("name_uz required"));
        assert!(report.contains("invalid status"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_upload_is_retryable() {
        let repo = MockRepository::new();
        let storage = LocalStorage::new(std::env::temp_dir(), "/media");
        assert!(matches!(
            run(&repo, &storage, &json!({"file": "/nope/upload.csv"})),
            Err(JobError::Retryable(_))
        ));
    }
}
