use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartList},
    error::{AppError, AppResult},
    models::CartItem,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_to_cart))
        .route("/user/{user_id}", get(cart_list))
        .route("/remove/{cart_item_id}", delete(remove_from_cart))
}

#[utoipa::path(
    post,
    path = "/api/cart/add",
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Item added to cart", body = ApiResponse<CartItem>),
        (status = 200, description = "Existing line quantity merged", body = ApiResponse<CartItem>),
        (status = 400, description = "Bad request"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CartItem>>)> {
    if payload.ordered_quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }
    if payload.product_name.trim().is_empty() || payload.category.trim().is_empty() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }

    let exist: Option<CartItem> =
        sqlx::query_as("SELECT * FROM cart_items WHERE buyer_id = $1 AND product_id = $2")
            .bind(payload.buyer_id)
            .bind(payload.product_id)
            .fetch_optional(&state.pool)
            .await?;

    // Merge semantics: a second add for the same product increments the
    // existing line instead of creating another one.
    if let Some(item) = exist {
        let merged: CartItem = sqlx::query_as(
            r#"
            UPDATE cart_items
            SET quantity = quantity + $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(payload.ordered_quantity)
        .fetch_one(&state.pool)
        .await?;

        return Ok((
            StatusCode::OK,
            Json(ApiResponse::success(
                "Cart item quantity updated",
                merged,
                None,
            )),
        ));
    }

    let cart_item: CartItem = sqlx::query_as(
        r#"
        INSERT INTO cart_items (id, buyer_id, product_id, product_name, category, quantity, unit, price, image)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.buyer_id)
    .bind(payload.product_id)
    .bind(&payload.product_name)
    .bind(&payload.category)
    .bind(payload.ordered_quantity)
    .bind(payload.unit.as_deref().unwrap_or("piece"))
    .bind(payload.price.unwrap_or(0))
    .bind(payload.image.as_deref().unwrap_or(""))
    .fetch_one(&state.pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Item added to cart successfully",
            cart_item,
            None,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/cart/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Buyer ID")
    ),
    responses(
        (status = 200, description = "List cart items for a buyer", body = ApiResponse<CartList>)
    ),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let items = sqlx::query_as::<_, CartItem>(
        "SELECT * FROM cart_items WHERE buyer_id = $1 ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success(
        "OK",
        CartList { items },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/cart/remove/{cart_item_id}",
    params(
        ("cart_item_id" = Uuid, Path, description = "Cart line ID")
    ),
    responses(
        (status = 200, description = "Item removed from cart", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Cart item not found"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(cart_item_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
        .bind(cart_item_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(Json(ApiResponse::success(
        "Item removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
