use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub category: String,
    pub image: Option<String>,
    pub price: i64,
    pub quantity_value: i32,
    pub quantity_unit: String,
    pub farmer_email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub price: Option<i64>,
    pub quantity_value: Option<i32>,
    pub quantity_unit: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}
