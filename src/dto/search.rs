use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    pub search_term: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub products: Vec<Product>,
    /// Category of the first matching product, recorded against the
    /// caller's preference counters.
    pub tracked_category: Option<String>,
}
