use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Product grouping shown in the storefront menu, bilingual per locale.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i32,
    pub name_uz: String,
    pub name_ru: String,
    pub sort_order: i32,
    pub status: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewCategory {
    pub name_uz: String,
    pub name_ru: String,
    pub sort_order: i32,
    pub status: bool,
}

impl NewCategory {
    pub fn new(name_uz: String, name_ru: String, sort_order: i32, status: bool) -> Self {
        Self {
            name_uz: name_uz.trim().to_string(),
            name_ru: name_ru.trim().to_string(),
            sort_order,
            status,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UpdateCategory {
    pub name_uz: String,
    pub name_ru: String,
    pub sort_order: i32,
    pub status: bool,
}
