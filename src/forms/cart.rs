use serde::Deserialize;

#[derive(Deserialize)]
/// Add-or-set a cart line; quantity is validated by the service.
pub struct CartItemForm {
    pub product_id: i32,
    pub quantity: f64,
}
