//! Repository implementation for catalog products.

use diesel::prelude::*;

use crate::domain::category::Category;
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::supplier::Supplier;
use crate::models::category::Category as DbCategory;
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
};
use crate::models::supplier::Supplier as DbSupplier;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProductListQuery, ProductReader, ProductWriter};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .find(id)
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let build = |query: &ProductListQuery| {
            let mut q = products::table.into_boxed();
            if let Some(category_id) = query.category_id {
                q = q.filter(products::category_id.eq(category_id));
            }
            if let Some(supplier_id) = query.supplier_id {
                q = q.filter(products::supplier_id.eq(supplier_id));
            }
            if let Some(status) = query.status {
                q = q.filter(products::status.eq(status));
            }
            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                q = q.filter(
                    products::name_uz
                        .like(pattern.clone())
                        .or(products::name_ru.like(pattern.clone()))
                        .or(products::description.like(pattern)),
                );
            }
            q
        };

        let total: i64 = build(&query).count().get_result(&mut conn)?;

        let mut page_query = build(&query).order(products::id.asc());
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            page_query = page_query.limit(per_page).offset((page - 1) * per_page);
        }

        let items = page_query
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((total as usize, items))
    }

    fn list_products_with_refs(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<(Product, Category, Supplier)>)> {
        use crate::schema::{categories, products, suppliers};

        let mut conn = self.conn()?;

        let build = |query: &ProductListQuery| {
            let mut q = products::table
                .inner_join(categories::table)
                .inner_join(suppliers::table)
                .into_boxed();
            if let Some(category_id) = query.category_id {
                q = q.filter(products::category_id.eq(category_id));
            }
            if let Some(supplier_id) = query.supplier_id {
                q = q.filter(products::supplier_id.eq(supplier_id));
            }
            if let Some(status) = query.status {
                q = q.filter(products::status.eq(status));
            }
            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                q = q.filter(
                    products::name_uz
                        .like(pattern.clone())
                        .or(products::name_ru.like(pattern.clone()))
                        .or(products::description.like(pattern)),
                );
            }
            q
        };

        let total: i64 = build(&query).count().get_result(&mut conn)?;

        let mut page_query = build(&query).order(products::id.asc());
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            page_query = page_query.limit(per_page).offset((page - 1) * per_page);
        }

        let rows = page_query.load::<(DbProduct, DbCategory, DbSupplier)>(&mut conn)?;
        let items = rows
            .into_iter()
            .map(|(p, c, s)| (p.into(), c.into(), s.into()))
            .collect();

        Ok((total as usize, items))
    }

    fn count_active_products(&self) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let total: i64 = products::table
            .filter(products::status.eq(true))
            .count()
            .get_result(&mut conn)?;

        Ok(total as usize)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_new: DbNewProduct = new_product.into();
        let created = diesel::insert_into(products::table)
            .values(&db_new)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into())
    }

    fn update_product(&self, id: i32, updates: &UpdateProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateProduct = updates.into();
        let updated = diesel::update(products::table.find(id))
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_product(&self, id: i32) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        diesel::delete(products::table.find(id)).execute(&mut conn)?;
        Ok(())
    }

    fn upsert_product_by_name(&self, product: &NewProduct) -> RepositoryResult<(Product, bool)> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let existing = products::table
            .filter(products::name_uz.eq(product.name_uz.as_str()))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        match existing {
            Some(row) => {
                let updated = diesel::update(products::table.find(row.id))
                    .set((
                        products::name_ru.eq(product.name_ru.as_str()),
                        products::category_id.eq(product.category_id),
                        products::supplier_id.eq(product.supplier_id),
                        products::image_url.eq(product.image_url.as_deref()),
                        products::description.eq(product.description.as_deref()),
                        products::status.eq(product.status),
                    ))
                    .get_result::<DbProduct>(&mut conn)?;
                Ok((updated.into(), false))
            }
            None => {
                let db_new: DbNewProduct = product.into();
                let created = diesel::insert_into(products::table)
                    .values(&db_new)
                    .get_result::<DbProduct>(&mut conn)?;
                Ok((created.into(), true))
            }
        }
    }
}
