use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch},
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::orders::OrderList,
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{admin_service, review_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders))
        .route("/orders/{order_id}/deliver", patch(deliver_order))
        .route("/reviews/skipped", delete(cleanup_skipped_reviews))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CleanupQuery {
    pub older_than_days: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CleanupResult {
    pub removed: u64,
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "All orders (admin only)", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state.pool, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{order_id}/deliver",
    params(
        ("order_id" = String, Path, description = "Order identifier")
    ),
    responses(
        (status = 200, description = "Order marked delivered", body = ApiResponse<Order>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn deliver_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = admin_service::mark_delivered(&state.pool, &user, &order_id).await?;
    Ok(Json(ApiResponse::success(
        "Order marked as delivered",
        order,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/admin/reviews/skipped",
    params(
        ("older_than_days" = Option<i64>, Query, description = "Cutoff in days, default 30")
    ),
    responses(
        (status = 200, description = "Skipped pending reviews purged", body = ApiResponse<CleanupResult>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn cleanup_skipped_reviews(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CleanupQuery>,
) -> AppResult<Json<ApiResponse<CleanupResult>>> {
    ensure_admin(&user)?;

    let days = query.older_than_days.unwrap_or(30).max(0);
    let cutoff = Utc::now() - Duration::days(days);
    let removed = review_service::cleanup_skipped(&state.pool, cutoff).await?;

    Ok(Json(ApiResponse::success(
        "Skipped reviews purged",
        CleanupResult { removed },
        Some(Meta::empty()),
    )))
}
