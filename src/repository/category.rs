//! Repository implementation for catalog categories.

use diesel::prelude::*;

use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::models::category::{
    Category as DbCategory, NewCategory as DbNewCategory, UpdateCategory as DbUpdateCategory,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let category = categories::table
            .find(id)
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(Into::into))
    }

    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let build = |query: &CategoryListQuery| {
            let mut q = categories::table.into_boxed();
            if let Some(status) = query.status {
                q = q.filter(categories::status.eq(status));
            }
            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                q = q.filter(
                    categories::name_uz
                        .like(pattern.clone())
                        .or(categories::name_ru.like(pattern)),
                );
            }
            q
        };

        let total: i64 = build(&query).count().get_result(&mut conn)?;

        let mut page_query = build(&query)
            .order((categories::sort_order.asc(), categories::id.asc()));
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            page_query = page_query.limit(per_page).offset((page - 1) * per_page);
        }

        let items = page_query
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((total as usize, items))
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_new: DbNewCategory = new_category.into();
        let created = diesel::insert_into(categories::table)
            .values(&db_new)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.into())
    }

    fn update_category(&self, id: i32, updates: &UpdateCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateCategory = updates.into();
        let updated = diesel::update(categories::table.find(id))
            .set(&db_updates)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_category(&self, id: i32) -> RepositoryResult<()> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        diesel::delete(categories::table.find(id)).execute(&mut conn)?;
        Ok(())
    }

    fn ensure_category_by_name(&self, name_uz: &str) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let existing = categories::table
            .filter(categories::name_uz.eq(name_uz))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        if let Some(category) = existing {
            return Ok(category.into());
        }

        // Imports only carry the Uzbek name; mirror it until an admin edits.
        let created = diesel::insert_into(categories::table)
            .values(&DbNewCategory {
                name_uz,
                name_ru: name_uz,
                sort_order: 0,
                status: true,
            })
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.into())
    }
}
