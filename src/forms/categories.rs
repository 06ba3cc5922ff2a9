use serde::Deserialize;
use validator::Validate;

use crate::domain::category::{NewCategory, UpdateCategory};

#[derive(Deserialize, Validate)]
/// Create/edit form for a category.
pub struct CategoryForm {
    #[validate(length(min = 1, message = "Uzbek name is required"))]
    pub name_uz: String,
    #[validate(length(min = 1, message = "Russian name is required"))]
    pub name_ru: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_status")]
    pub status: bool,
}

fn default_status() -> bool {
    true
}

impl From<&CategoryForm> for NewCategory {
    fn from(form: &CategoryForm) -> Self {
        NewCategory::new(
            form.name_uz.clone(),
            form.name_ru.clone(),
            form.sort_order,
            form.status,
        )
    }
}

impl From<&CategoryForm> for UpdateCategory {
    fn from(form: &CategoryForm) -> Self {
        Self {
            name_uz: form.name_uz.trim().to_string(),
            name_ru: form.name_ru.trim().to_string(),
            sort_order: form.sort_order,
            status: form.status,
        }
    }
}
