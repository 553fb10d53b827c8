use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::reviews::{
        PendingReviewList, ProductRating, ResolveReviewRequest, ReviewList, SavePendingRequest,
        SavePendingResponse, SubmitReviewRequest,
    },
    error::AppResult,
    models::{PendingReview, Review},
    response::{ApiResponse, Meta},
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/save-pending", post(save_pending))
        .route("/submit/{review_id}", patch(resolve_pending))
        .route("/submit", post(submit_direct))
        .route("/pending/{user_id}", get(list_pending))
        .route("/product/{product_id}", get(product_rating))
        .route("/product/{product_id}/reviews", get(product_reviews))
}

#[utoipa::path(
    post,
    path = "/api/rating-review/save-pending",
    request_body = SavePendingRequest,
    responses(
        (status = 200, description = "Pending reviews seeded", body = ApiResponse<SavePendingResponse>)
    ),
    tag = "Reviews"
)]
pub async fn save_pending(
    State(state): State<AppState>,
    Json(payload): Json<SavePendingRequest>,
) -> AppResult<Json<ApiResponse<SavePendingResponse>>> {
    let count = review_service::save_pending(
        &state.pool,
        payload.user_id,
        &payload.order_id,
        &payload.cart_items,
    )
    .await?;

    Ok(Json(ApiResponse::success(
        "Pending reviews saved",
        SavePendingResponse { count },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/rating-review/submit/{review_id}",
    params(
        ("review_id" = Uuid, Path, description = "Pending review ID")
    ),
    request_body = ResolveReviewRequest,
    responses(
        (status = 200, description = "Pending review resolved", body = ApiResponse<PendingReview>),
        (status = 400, description = "Already resolved, duplicate review or bad rating"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Reviews"
)]
pub async fn resolve_pending(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<ResolveReviewRequest>,
) -> AppResult<Json<ApiResponse<PendingReview>>> {
    let resolved = review_service::resolve_pending(&state.pool, review_id, payload).await?;
    Ok(Json(ApiResponse::success(
        "Review resolved",
        resolved,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/rating-review/submit",
    request_body = SubmitReviewRequest,
    responses(
        (status = 201, description = "Review submitted", body = ApiResponse<Review>),
        (status = 400, description = "Duplicate review or bad rating"),
    ),
    tag = "Reviews"
)]
pub async fn submit_direct(
    State(state): State<AppState>,
    Json(payload): Json<SubmitReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Review>>)> {
    let review = review_service::submit_direct(&state.pool, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Review submitted successfully",
            review,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/rating-review/pending/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Unresolved pending reviews", body = ApiResponse<PendingReviewList>)
    ),
    tag = "Reviews"
)]
pub async fn list_pending(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PendingReviewList>>> {
    let items = review_service::list_pending_for_user(&state.pool, user_id).await?;
    Ok(Json(ApiResponse::success(
        "OK",
        PendingReviewList { items },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/rating-review/product/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Average rating and review count", body = ApiResponse<ProductRating>)
    ),
    tag = "Reviews"
)]
pub async fn product_rating(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductRating>>> {
    let rating = review_service::product_rating(&state.pool, product_id).await?;
    Ok(Json(ApiResponse::success("OK", rating, None)))
}

#[utoipa::path(
    get,
    path = "/api/rating-review/product/{product_id}/reviews",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "All reviews for a product", body = ApiResponse<ReviewList>)
    ),
    tag = "Reviews"
)]
pub async fn product_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let (reviews, average_rating) = review_service::product_reviews(&state.pool, product_id).await?;
    Ok(Json(ApiResponse::success(
        "OK",
        ReviewList {
            reviews,
            average_rating,
        },
        None,
    )))
}
