use serde::Deserialize;
use validator::Validate;

use crate::domain::supplier::{NewSupplier, UpdateSupplier};
use crate::forms::optional;

#[derive(Deserialize, Validate)]
/// Create/edit form for a supplier.
pub struct SupplierForm {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_status")]
    pub status: bool,
}

fn default_status() -> bool {
    true
}

impl From<&SupplierForm> for NewSupplier {
    fn from(form: &SupplierForm) -> Self {
        NewSupplier::new(
            form.name.clone(),
            optional(&form.phone),
            optional(&form.address),
            form.status,
        )
    }
}

impl From<&SupplierForm> for UpdateSupplier {
    fn from(form: &SupplierForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            phone: optional(&form.phone),
            address: optional(&form.address),
            status: form.status,
        }
    }
}
