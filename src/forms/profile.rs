use serde::Deserialize;
use validator::Validate;

use crate::domain::user::UpdateProfile;
use crate::forms::optional;

#[derive(Deserialize, Validate)]
/// Profile edit form; empty fields clear the stored value.
pub struct ProfileForm {
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

impl From<&ProfileForm> for UpdateProfile {
    fn from(form: &ProfileForm) -> Self {
        Self {
            email: optional(&form.email),
            fio: optional(&form.fio),
            phone: optional(&form.phone),
            address: optional(&form.address),
            company_name: optional(&form.company_name),
            inn: optional(&form.inn),
            bank_details: optional(&form.bank_details),
            legal_address: optional(&form.legal_address),
            responsible_person: optional(&form.responsible_person),
        }
    }
}
