//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce the invariants the rest of the crate relies on
//! (validated email, E.164 phone, bounded quantities) so values reaching the
//! repository layer can be treated as trusted.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use phonenumber::{Mode, parse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateEmail;

/// Errors produced when constructing a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    #[error("invalid email address")]
    InvalidEmail,
    #[error("value cannot be empty")]
    EmptyString,
    #[error("invalid phone number")]
    InvalidPhone,
    #[error("quantity must be at least {MIN_QUANTITY}")]
    QuantityTooSmall,
    #[error("quantity is not a number")]
    QuantityNotANumber,
    #[error("invalid uuid value")]
    InvalidUuid,
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

pub const MIN_QUANTITY: f64 = 0.1;

/// Order/cart line quantity in kilograms.
///
/// Positive, at least [`MIN_QUANTITY`], normalized to two decimal places.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Quantity(f64);

impl Quantity {
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if !value.is_finite() {
            return Err(TypeConstraintError::QuantityNotANumber);
        }
        let rounded = (value * 100.0).round() / 100.0;
        if rounded < MIN_QUANTITY {
            return Err(TypeConstraintError::QuantityTooSmall);
        }
        Ok(Self(rounded))
    }

    pub const fn get(self) -> f64 {
        self.0
    }

    /// Saturating addition used when carts merge; stays two-decimal.
    pub fn saturating_add(self, other: Self) -> Self {
        Self(((self.0 + other.0) * 100.0).round() / 100.0)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Quantity {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = email.into().trim().to_lowercase();
        if normalized.validate_email() {
            Ok(Self(normalized))
        } else {
            Err(TypeConstraintError::InvalidEmail)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized phone number (E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        let parsed = parse(None, trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
        Ok(Self(parsed.format().mode(Mode::E164).to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifier of an asynchronous job, exposed to clients as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            Uuid::parse_str(s).map_err(|_| TypeConstraintError::InvalidUuid)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_rejects_below_minimum() {
        assert_eq!(
            Quantity::new(0.04),
            Err(TypeConstraintError::QuantityTooSmall)
        );
        assert_eq!(
            Quantity::new(-1.0),
            Err(TypeConstraintError::QuantityTooSmall)
        );
        assert_eq!(
            Quantity::new(f64::NAN),
            Err(TypeConstraintError::QuantityNotANumber)
        );
    }

    #[test]
    fn quantity_rounds_to_two_decimals() {
        assert_eq!(Quantity::new(1.006).unwrap().get(), 1.01);
        assert_eq!(Quantity::new(2.499).unwrap().get(), 2.5);
        assert_eq!(Quantity::new(0.1).unwrap().get(), 0.1);
    }

    #[test]
    fn quantities_accumulate() {
        let a = Quantity::new(1.25).unwrap();
        let b = Quantity::new(0.5).unwrap();
        assert_eq!(a.saturating_add(b).get(), 1.75);
    }

    #[test]
    fn email_normalizes() {
        let email = Email::new("  Rustam@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "rustam@example.com");
        assert!(Email::new("not-an-email").is_err());
    }

    #[test]
    fn phone_normalizes_to_e164() {
        let phone = PhoneNumber::new("+998 90 123-45-67").unwrap();
        assert_eq!(phone.as_str(), "+998901234567");
        assert!(PhoneNumber::new("").is_err());
    }

    #[test]
    fn job_id_round_trips_through_display() {
        let id = JobId::generate();
        assert_eq!(id.to_string().parse::<JobId>().unwrap(), id);
        assert!("nope".parse::<JobId>().is_err());
    }
}
