use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{PendingReview, Review};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PendingItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub image: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SavePendingRequest {
    pub user_id: Uuid,
    pub order_id: String,
    pub cart_items: Vec<PendingItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SavePendingResponse {
    pub count: usize,
}

/// Resolution of a pending review: `status` is either "complete" (rating
/// required) or "skipped".
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveReviewRequest {
    pub status: String,
    pub rating: Option<i32>,
    pub review: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitReviewRequest {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub rating: i32,
    pub review: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductRating {
    pub average_rating: f64,
    pub review_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub reviews: Vec<Review>,
    pub average_rating: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingReviewList {
    pub items: Vec<PendingReview>,
}
