//! Repository implementation for user accounts.

use diesel::prelude::*;

use crate::domain::user::{NewUser, Role, UpdateProfile, User};
use crate::models::user::{
    NewUser as DbNewUser, UpdateProfile as DbUpdateProfile, User as DbUser,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, UserListQuery, UserReader, UserWriter};

fn into_domain(db_user: DbUser) -> RepositoryResult<User> {
    User::try_from(db_user).map_err(RepositoryError::from)
}

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table.find(id).first::<DbUser>(&mut conn).optional()?;

        db_user.map(into_domain).transpose()
    }

    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table
            .filter(users::username.eq(username))
            .first::<DbUser>(&mut conn)
            .optional()?;

        db_user.map(into_domain).transpose()
    }

    fn get_credentials(&self, username: &str) -> RepositoryResult<Option<(User, String)>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table
            .filter(users::username.eq(username))
            .first::<DbUser>(&mut conn)
            .optional()?;

        match db_user {
            Some(db_user) => {
                let hash = db_user.password_hash.clone();
                Ok(Some((into_domain(db_user)?, hash)))
            }
            None => Ok(None),
        }
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let build = |query: &UserListQuery| {
            let mut q = users::table.into_boxed();
            if let Some(role) = query.role {
                q = q.filter(users::role.eq(role.as_str()));
            }
            if let Some(user_type) = query.user_type {
                q = q.filter(users::user_type.eq(user_type.as_str()));
            }
            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                q = q.filter(
                    users::username
                        .like(pattern.clone())
                        .or(users::email.like(pattern.clone()))
                        .or(users::fio.like(pattern.clone()))
                        .or(users::company_name.like(pattern)),
                );
            }
            q
        };

        let total: i64 = build(&query).count().get_result(&mut conn)?;

        let mut page_query = build(&query).order(users::created_at.desc());
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            page_query = page_query.limit(per_page).offset((page - 1) * per_page);
        }

        let items = page_query
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(into_domain)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total as usize, items))
    }

    fn count_users_with_role(&self, role: Role) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let total: i64 = users::table
            .filter(users::role.eq(role.as_str()))
            .count()
            .get_result(&mut conn)?;

        Ok(total as usize)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_new_user: DbNewUser = new_user.into();
        let created = diesel::insert_into(users::table)
            .values(&db_new_user)
            .get_result::<DbUser>(&mut conn)?;

        into_domain(created)
    }

    fn update_profile(&self, user_id: i32, updates: &UpdateProfile) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateProfile = updates.into();
        let updated = diesel::update(users::table.find(user_id))
            .set(&db_updates)
            .get_result::<DbUser>(&mut conn)?;

        into_domain(updated)
    }

    fn set_user_role(&self, user_id: i32, role: Role) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let updated = diesel::update(users::table.find(user_id))
            .set(users::role.eq(role.as_str()))
            .get_result::<DbUser>(&mut conn)?;

        into_domain(updated)
    }
}
