use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::TypeConstraintError;
use crate::domain::user::{
    NewUser as DomainNewUser, Role, UpdateProfile as DomainUpdateProfile, User as DomainUser,
    UserType,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`]; the only place the
/// password hash is visible.
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub user_type: String,
    pub fio: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company_name: Option<String>,
    pub inn: Option<String>,
    pub bank_details: Option<String>,
    pub legal_address: Option<String>,
    pub responsible_person: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
/// Insertable form of [`User`].
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub user_type: &'a str,
    pub fio: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub company_name: Option<&'a str>,
    pub inn: Option<&'a str>,
    pub bank_details: Option<&'a str>,
    pub legal_address: Option<&'a str>,
    pub responsible_person: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users, treat_none_as_null = true)]
/// Profile changeset; `None` clears the column.
pub struct UpdateProfile<'a> {
    pub email: Option<&'a str>,
    pub fio: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub company_name: Option<&'a str>,
    pub inn: Option<&'a str>,
    pub bank_details: Option<&'a str>,
    pub legal_address: Option<&'a str>,
    pub responsible_person: Option<&'a str>,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: Role::try_from(user.role.as_str())?,
            user_type: UserType::try_from(user.user_type.as_str())?,
            fio: user.fio,
            phone: user.phone,
            address: user.address,
            company_name: user.company_name,
            inn: user.inn,
            bank_details: user.bank_details,
            legal_address: user.legal_address,
            responsible_person: user.responsible_person,
            created_at: user.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            username: user.username.as_str(),
            email: user.email.as_deref(),
            password_hash: user.password_hash.as_str(),
            role: user.role.as_str(),
            user_type: user.user_type.as_str(),
            fio: user.fio.as_deref(),
            phone: user.phone.as_deref(),
            address: user.address.as_deref(),
            company_name: user.company_name.as_deref(),
            inn: user.inn.as_deref(),
            bank_details: user.bank_details.as_deref(),
            legal_address: user.legal_address.as_deref(),
            responsible_person: user.responsible_person.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateProfile> for UpdateProfile<'a> {
    fn from(updates: &'a DomainUpdateProfile) -> Self {
        Self {
            email: updates.email.as_deref(),
            fio: updates.fio.as_deref(),
            phone: updates.phone.as_deref(),
            address: updates.address.as_deref(),
            company_name: updates.company_name.as_deref(),
            inn: updates.inn.as_deref(),
            bank_details: updates.bank_details.as_deref(),
            legal_address: updates.legal_address.as_deref(),
            responsible_person: updates.responsible_person.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn db_user_into_domain() {
        let now = Utc::now().naive_utc();
        let db_user = User {
            id: 3,
            username: "madina".to_string(),
            email: Some("madina@example.com".to_string()),
            password_hash: "hash".to_string(),
            role: "admin".to_string(),
            user_type: "individual".to_string(),
            fio: Some("Madina".to_string()),
            phone: None,
            address: None,
            company_name: None,
            inn: None,
            bank_details: None,
            legal_address: None,
            responsible_person: None,
            created_at: now,
        };
        let domain = DomainUser::try_from(db_user).unwrap();
        assert_eq!(domain.id, 3);
        assert_eq!(domain.role, Role::Admin);
        assert_eq!(domain.user_type, UserType::Individual);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let now = Utc::now().naive_utc();
        let db_user = User {
            id: 1,
            username: "x".to_string(),
            email: None,
            password_hash: "hash".to_string(),
            role: "owner".to_string(),
            user_type: "individual".to_string(),
            fio: None,
            phone: None,
            address: None,
            company_name: None,
            inn: None,
            bank_details: None,
            legal_address: None,
            responsible_person: None,
            created_at: now,
        };
        assert!(DomainUser::try_from(db_user).is_err());
    }
}
