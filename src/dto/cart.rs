use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::CartItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub buyer_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub ordered_quantity: i32,
    pub unit: Option<String>,
    pub price: Option<i64>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartItem>,
}
