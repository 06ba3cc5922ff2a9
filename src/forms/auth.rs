use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
/// Registration form covering both individual and legal-entity customers.
pub struct SignupForm {
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    /// "individual" or "legal"; which extra fields are required depends on it.
    pub user_type: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub fio: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub inn: String,
    #[serde(default)]
    pub bank_details: String,
    #[serde(default)]
    pub legal_address: String,
    #[serde(default)]
    pub responsible_person: String,
}

#[derive(Deserialize, Validate)]
pub struct SigninForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}
