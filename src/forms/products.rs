use serde::Deserialize;
use validator::Validate;

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::optional;

#[derive(Deserialize, Validate)]
/// Create/edit form for a product.
pub struct ProductForm {
    #[validate(length(min = 1, message = "Uzbek name is required"))]
    pub name_uz: String,
    #[validate(length(min = 1, message = "Russian name is required"))]
    pub name_ru: String,
    pub category_id: i32,
    pub supplier_id: i32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_status")]
    pub status: bool,
}

fn default_status() -> bool {
    true
}

impl From<&ProductForm> for NewProduct {
    fn from(form: &ProductForm) -> Self {
        NewProduct::new(
            form.name_uz.clone(),
            form.name_ru.clone(),
            form.category_id,
            form.supplier_id,
            optional(&form.image_url),
            optional(&form.description),
            form.status,
        )
    }
}

impl From<&ProductForm> for UpdateProduct {
    fn from(form: &ProductForm) -> Self {
        let new = NewProduct::from(form);
        Self {
            name_uz: new.name_uz,
            name_ru: new.name_ru,
            category_id: new.category_id,
            supplier_id: new.supplier_id,
            image_url: new.image_url,
            description: new.description,
            status: new.status,
        }
    }
}
