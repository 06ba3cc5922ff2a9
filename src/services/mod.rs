use thiserror::Error;

use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod jobs;
pub mod main;
pub mod orders;
pub mod products;
pub mod profile;
pub mod storage;
pub mod suppliers;
pub mod telegram;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// User-facing message rendered as a flash alert or inline error.
    #[error("{0}")]
    Form(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Gate for back-office operations.
pub fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.role.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Gate for role management.
pub fn ensure_superadmin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.role.is_superadmin() {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Carts and orders belong to customers; back-office accounts are refused.
pub fn ensure_customer(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.role.is_admin() {
        Err(ServiceError::Unauthorized)
    } else {
        Ok(())
    }
}
