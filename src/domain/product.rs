use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Catalog entry. Deliberately carries no price: pricing is negotiated with
/// the fulfillment operator over Telegram.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name_uz: String,
    pub name_ru: String,
    pub category_id: i32,
    pub supplier_id: i32,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub status: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewProduct {
    pub name_uz: String,
    pub name_ru: String,
    pub category_id: i32,
    pub supplier_id: i32,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub status: bool,
}

impl NewProduct {
    /// Trims names and sanitizes the description, which may contain markup
    /// pasted from supplier price sheets.
    pub fn new(
        name_uz: String,
        name_ru: String,
        category_id: i32,
        supplier_id: i32,
        image_url: Option<String>,
        description: Option<String>,
        status: bool,
    ) -> Self {
        Self {
            name_uz: name_uz.trim().to_string(),
            name_ru: name_ru.trim().to_string(),
            category_id,
            supplier_id,
            image_url: image_url
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            description: description
                .map(|s| ammonia::clean(s.trim()))
                .filter(|s| !s.is_empty()),
            status,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UpdateProduct {
    pub name_uz: String,
    pub name_ru: String,
    pub category_id: i32,
    pub supplier_id: i32,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub status: bool,
}
