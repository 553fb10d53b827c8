use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::tracking::{TrackList, TrackView, UpdateStatusRequest},
    error::AppResult,
    models::OrderTrack,
    response::{ApiResponse, Meta},
    services::tracking_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/track/{tracking_number}", get(track_by_number))
        .route("/by-order-id/{order_id}", get(track_by_order_id))
        .route("/user/{user_id}", get(user_order_history))
        .route("/update-status/{tracking_number}", patch(update_status))
}

#[utoipa::path(
    get,
    path = "/api/ordertrack/track/{tracking_number}",
    params(
        ("tracking_number" = String, Path, description = "Public tracking number, e.g. ALKmewz1x2aB3CD")
    ),
    responses(
        (status = 200, description = "Tracking view with items and history", body = ApiResponse<TrackView>),
        (status = 404, description = "Unknown tracking number"),
    ),
    tag = "Order Tracking"
)]
pub async fn track_by_number(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> AppResult<Json<ApiResponse<TrackView>>> {
    let view = tracking_service::get_by_tracking_number(&state.pool, &tracking_number).await?;
    Ok(Json(ApiResponse::success("OK", view, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/ordertrack/by-order-id/{order_id}",
    params(
        ("order_id" = String, Path, description = "Order identifier")
    ),
    responses(
        (status = 200, description = "Tracking view with items and history", body = ApiResponse<TrackView>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Order Tracking"
)]
pub async fn track_by_order_id(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<ApiResponse<TrackView>>> {
    let view = tracking_service::get_by_order_id(&state.pool, &order_id).await?;
    Ok(Json(ApiResponse::success("OK", view, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/ordertrack/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Buyer ID")
    ),
    responses(
        (status = 200, description = "Tracked orders for a buyer", body = ApiResponse<TrackList>)
    ),
    tag = "Order Tracking"
)]
pub async fn user_order_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TrackList>>> {
    let items = tracking_service::list_for_buyer(&state.pool, user_id).await?;
    Ok(Json(ApiResponse::success(
        "OK",
        TrackList { items },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/ordertrack/update-status/{tracking_number}",
    params(
        ("tracking_number" = String, Path, description = "Public tracking number")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status appended", body = ApiResponse<OrderTrack>),
        (status = 400, description = "Unknown status or invalid transition"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Order Tracking"
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderTrack>>> {
    let track = tracking_service::append_status(
        &state.pool,
        &tracking_number,
        &payload.status,
        payload.note.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse::success(
        "Order status updated successfully",
        track,
        Some(Meta::empty()),
    )))
}
