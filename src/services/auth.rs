//! Registration and login.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use validator::Validate;

use crate::domain::types::{Email, PhoneNumber};
use crate::domain::user::{NewUser, Role, User, UserType};
use crate::forms::auth::{SigninForm, SignupForm};
use crate::forms::optional;
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("failed to hash password: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn check_inn(inn: &str) -> ServiceResult<()> {
    let valid_len = (6..=64).contains(&inn.len());
    let valid_chars = inn
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid_len && valid_chars {
        Ok(())
    } else {
        Err(ServiceError::Form("invalid INN format".to_string()))
    }
}

/// Registers a customer account. Individual signups need a name, phone and
/// address; legal entities additionally need the company paperwork fields.
pub fn register<R>(repo: &R, form: &SignupForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let user_type = UserType::try_from(form.user_type.as_str())?;

    let mut missing: Vec<&str> = Vec::new();
    let mut required: Vec<(&str, &str)> = vec![("phone", form.phone.as_str())];
    match user_type {
        UserType::Individual => {
            required.push(("fio", form.fio.as_str()));
            required.push(("address", form.address.as_str()));
        }
        UserType::Legal => {
            required.push(("company_name", form.company_name.as_str()));
            required.push(("responsible_person", form.responsible_person.as_str()));
            required.push(("address", form.address.as_str()));
            required.push(("legal_address", form.legal_address.as_str()));
            required.push(("inn", form.inn.as_str()));
            required.push(("bank_details", form.bank_details.as_str()));
            required.push(("email", form.email.as_str()));
        }
    }
    for (name, value) in required {
        if value.trim().is_empty() {
            missing.push(name);
        }
    }
    if !missing.is_empty() {
        return Err(ServiceError::Form(format!(
            "required fields missing: {}",
            missing.join(", ")
        )));
    }

    let phone = PhoneNumber::new(form.phone.as_str())?;
    let email = match optional(&form.email) {
        Some(raw) => Some(Email::new(raw)?.into_inner()),
        None => None,
    };
    if let Some(inn) = optional(&form.inn) {
        check_inn(&inn)?;
    }

    let username = form.username.trim().to_string();
    if repo.get_user_by_username(&username)?.is_some() {
        return Err(ServiceError::Form("username is already taken".to_string()));
    }

    let new_user = NewUser {
        username,
        email,
        password_hash: hash_password(&form.password)?,
        // Self-service signup never grants back-office roles.
        role: Role::Customer,
        user_type,
        fio: optional(&form.fio),
        phone: Some(phone.into_inner()),
        address: optional(&form.address),
        company_name: optional(&form.company_name),
        inn: optional(&form.inn),
        bank_details: optional(&form.bank_details),
        legal_address: optional(&form.legal_address),
        responsible_person: optional(&form.responsible_person),
    };

    repo.create_user(&new_user).map_err(|err| {
        log::error!("Failed to create user: {err}");
        ServiceError::from(err)
    })
}

/// Verifies credentials, returning the account on success.
pub fn login<R>(repo: &R, form: &SigninForm) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let rejected = || ServiceError::Form("invalid username or password".to_string());

    let (user, hash) = repo
        .get_credentials(form.username.trim())?
        .ok_or_else(rejected)?;

    if !verify_password(&form.password, &hash) {
        return Err(rejected());
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hashing_round_trips() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-hash"));
    }

    #[test]
    fn inn_format() {
        assert!(check_inn("123456789").is_ok());
        assert!(check_inn("AB-1234").is_ok());
        assert!(check_inn("12345").is_err());
        assert!(check_inn("1234 5678").is_err());
    }
}
