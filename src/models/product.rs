use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct,
    UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
/// Diesel model for [`crate::domain::product::Product`].
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

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name_uz: &'a str,
    pub name_ru: &'a str,
    pub category_id: i32,
    pub supplier_id: i32,
    pub image_url: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products, treat_none_as_null = true)]
pub struct UpdateProduct<'a> {
    pub name_uz: &'a str,
    pub name_ru: &'a str,
    pub category_id: i32,
    pub supplier_id: i32,
    pub image_url: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: bool,
}

impl From<Product> for DomainProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name_uz: product.name_uz,
            name_ru: product.name_ru,
            category_id: product.category_id,
            supplier_id: product.supplier_id,
            image_url: product.image_url,
            description: product.description,
            status: product.status,
            created_at: product.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(product: &'a DomainNewProduct) -> Self {
        Self {
            name_uz: product.name_uz.as_str(),
            name_ru: product.name_ru.as_str(),
            category_id: product.category_id,
            supplier_id: product.supplier_id,
            image_url: product.image_url.as_deref(),
            description: product.description.as_deref(),
            status: product.status,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(updates: &'a DomainUpdateProduct) -> Self {
        Self {
            name_uz: updates.name_uz.as_str(),
            name_ru: updates.name_ru.as_str(),
            category_id: updates.category_id,
            supplier_id: updates.supplier_id,
            image_url: updates.image_url.as_deref(),
            description: updates.description.as_deref(),
            status: updates.status,
        }
    }
}
