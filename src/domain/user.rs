use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Access level carried in the JWT and stored on the user row.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
    Superadmin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    /// Admins and superadmins share the back-office surface.
    pub const fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }

    pub const fn is_superadmin(self) -> bool {
        matches!(self, Role::Superadmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown role: {other}"
            ))),
        }
    }
}

/// Whether the account belongs to a private person or a legal entity.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Individual,
    Legal,
}

impl UserType {
    pub const fn as_str(self) -> &'static str {
        match self {
            UserType::Individual => "individual",
            UserType::Legal => "legal",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UserType {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "individual" => Ok(UserType::Individual),
            "legal" => Ok(UserType::Legal),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown user type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub user_type: UserType,
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

impl User {
    /// Name used when addressing the customer: company for legal entities,
    /// otherwise the personal name, falling back to the login.
    pub fn display_name(&self) -> &str {
        if self.user_type == UserType::Legal
            && let Some(company) = self.company_name.as_deref().filter(|s| !s.is_empty())
        {
            return company;
        }
        self.fio
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Payload for registering an account; the password is already hashed.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub user_type: UserType,
    pub fio: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company_name: Option<String>,
    pub inn: Option<String>,
    pub bank_details: Option<String>,
    pub legal_address: Option<String>,
    pub responsible_person: Option<String>,
}

/// Profile fields a signed-in user may change about themselves.
#[derive(Clone, Debug, Default)]
pub struct UpdateProfile {
    pub email: Option<String>,
    pub fio: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company_name: Option<String>,
    pub inn: Option<String>,
    pub bank_details: Option<String>,
    pub legal_address: Option<String>,
    pub responsible_person: Option<String>,
}
