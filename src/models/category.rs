use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, NewCategory as DomainNewCategory,
    UpdateCategory as DomainUpdateCategory,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::categories)]
/// Diesel model for [`crate::domain::category::Category`].
pub struct Category {
    pub id: i32,
    pub name_uz: String,
    pub name_ru: String,
    pub sort_order: i32,
    pub status: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    pub name_uz: &'a str,
    pub name_ru: &'a str,
    pub sort_order: i32,
    pub status: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
pub struct UpdateCategory<'a> {
    pub name_uz: &'a str,
    pub name_ru: &'a str,
    pub sort_order: i32,
    pub status: bool,
}

impl From<Category> for DomainCategory {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name_uz: category.name_uz,
            name_ru: category.name_ru,
            sort_order: category.sort_order,
            status: category.status,
            created_at: category.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewCategory> for NewCategory<'a> {
    fn from(category: &'a DomainNewCategory) -> Self {
        Self {
            name_uz: category.name_uz.as_str(),
            name_ru: category.name_ru.as_str(),
            sort_order: category.sort_order,
            status: category.status,
        }
    }
}

impl<'a> From<&'a DomainUpdateCategory> for UpdateCategory<'a> {
    fn from(updates: &'a DomainUpdateCategory) -> Self {
        Self {
            name_uz: updates.name_uz.as_str(),
            name_ru: updates.name_ru.as_str(),
            sort_order: updates.sort_order,
            status: updates.status,
        }
    }
}
