use serde::Deserialize;

#[derive(Deserialize)]
/// Admin form advancing an order to the requested status.
pub struct OrderStatusForm {
    pub status: String,
}
