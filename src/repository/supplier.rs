//! Repository implementation for suppliers.

use diesel::prelude::*;

use crate::domain::supplier::{NewSupplier, Supplier, UpdateSupplier};
use crate::models::supplier::{
    NewSupplier as DbNewSupplier, Supplier as DbSupplier, UpdateSupplier as DbUpdateSupplier,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, SupplierListQuery, SupplierReader, SupplierWriter};

impl SupplierReader for DieselRepository {
    fn get_supplier_by_id(&self, id: i32) -> RepositoryResult<Option<Supplier>> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;
        let supplier = suppliers::table
            .find(id)
            .first::<DbSupplier>(&mut conn)
            .optional()?;

        Ok(supplier.map(Into::into))
    }

    fn list_suppliers(&self, query: SupplierListQuery) -> RepositoryResult<(usize, Vec<Supplier>)> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;

        let build = |query: &SupplierListQuery| {
            let mut q = suppliers::table.into_boxed();
            if let Some(status) = query.status {
                q = q.filter(suppliers::status.eq(status));
            }
            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                q = q.filter(suppliers::name.like(pattern));
            }
            q
        };

        let total: i64 = build(&query).count().get_result(&mut conn)?;

        let mut page_query = build(&query).order(suppliers::name.asc());
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            page_query = page_query.limit(per_page).offset((page - 1) * per_page);
        }

        let items = page_query
            .load::<DbSupplier>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((total as usize, items))
    }
}

impl SupplierWriter for DieselRepository {
    fn create_supplier(&self, new_supplier: &NewSupplier) -> RepositoryResult<Supplier> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;
        let db_new: DbNewSupplier = new_supplier.into();
        let created = diesel::insert_into(suppliers::table)
            .values(&db_new)
            .get_result::<DbSupplier>(&mut conn)?;

        Ok(created.into())
    }

    fn update_supplier(&self, id: i32, updates: &UpdateSupplier) -> RepositoryResult<Supplier> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateSupplier = updates.into();
        let updated = diesel::update(suppliers::table.find(id))
            .set(&db_updates)
            .get_result::<DbSupplier>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_supplier(&self, id: i32) -> RepositoryResult<()> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;
        diesel::delete(suppliers::table.find(id)).execute(&mut conn)?;
        Ok(())
    }

    fn ensure_supplier_by_name(&self, name: &str) -> RepositoryResult<Supplier> {
        use crate::schema::suppliers;

        let mut conn = self.conn()?;
        let existing = suppliers::table
            .filter(suppliers::name.eq(name))
            .first::<DbSupplier>(&mut conn)
            .optional()?;

        if let Some(supplier) = existing {
            return Ok(supplier.into());
        }

        let created = diesel::insert_into(suppliers::table)
            .values(&DbNewSupplier {
                name,
                phone: None,
                address: None,
                status: true,
            })
            .get_result::<DbSupplier>(&mut conn)?;

        Ok(created.into())
    }
}
