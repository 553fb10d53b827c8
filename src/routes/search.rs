use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::search::{SearchRequest, SearchResponse},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::recommendation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/search-product", post(search_product))
}

#[utoipa::path(
    post,
    path = "/api/search-product",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching products, first match's category recorded", body = ApiResponse<SearchResponse>),
        (status = 404, description = "No products matched"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Search"
)]
pub async fn search_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SearchRequest>,
) -> AppResult<Json<ApiResponse<SearchResponse>>> {
    let (products, tracked_category) =
        recommendation_service::search_products(&state.pool, &user.email, &payload.search_term)
            .await?;

    Ok(Json(ApiResponse::success(
        "OK",
        SearchResponse {
            products,
            tracked_category,
        },
        Some(Meta::empty()),
    )))
}
