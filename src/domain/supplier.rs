use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Farm or wholesaler the products are sourced from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewSupplier {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: bool,
}

impl NewSupplier {
    pub fn new(name: String, phone: Option<String>, address: Option<String>, status: bool) -> Self {
        Self {
            name: name.trim().to_string(),
            phone: phone.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            address: address
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            status,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UpdateSupplier {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: bool,
}
