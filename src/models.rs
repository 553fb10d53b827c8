use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Fixed category set shared by listings and the preference counters.
pub const CATEGORIES: [&str; 7] = [
    "vegetables",
    "fruits",
    "grains",
    "dairy",
    "poultry",
    "seafood",
    "others",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub image: String,
    /// Price per unit, in the smallest currency denomination.
    pub price: i64,
    pub quantity_value: i32,
    pub quantity_unit: String,
    pub farmer_email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub quantity: i32,
    pub unit: String,
    pub price: i64,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Administrative order record. Immutable after checkout except the
/// delivered flag.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub order_id: String,
    pub buyer_id: Uuid,
    pub total_price: i64,
    pub delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub ordered_date: DateTime<Utc>,
}

/// Line-item snapshot taken at checkout; shared by the order and the
/// tracking views.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_ref: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit: String,
    pub price: i64,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// Buyer-facing shipment record, keyed by the public tracking number.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderTrack {
    pub id: Uuid,
    pub tracking_number: String,
    pub order_id: String,
    pub buyer_id: Uuid,
    pub total_amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TrackEvent {
    pub id: Uuid,
    pub track_id: Uuid,
    pub status: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PendingReview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub order_id: String,
    pub rating: Option<i32>,
    pub review: String,
    pub status: String,
    pub image: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub rating: i32,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CategoryPreference {
    pub user_email: String,
    pub category: String,
    pub searches: i32,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub amount: i64,
    pub purpose: String,
    pub repayment_months: i32,
    pub preferred_start_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
