use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CATEGORIES, Product},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::recommendation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/recommended/{email}", get(recommended_products))
        .route("/farmer/{email}", get(list_farmer_products))
        .route("/{id}", get(get_product))
        .route("/{id}", put(update_product))
        .route("/{id}", delete(delete_product))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Listing created", body = ApiResponse<Product>),
        (status = 400, description = "Bad request"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if !CATEGORIES.contains(&payload.category.as_str()) {
        return Err(AppError::BadRequest(format!(
            "category must be one of: {}",
            CATEGORIES.join(", ")
        )));
    }
    if payload.price <= 0 {
        return Err(AppError::BadRequest("price must be positive".to_string()));
    }
    if payload.quantity_value < 0 {
        return Err(AppError::BadRequest(
            "quantity must not be negative".to_string(),
        ));
    }

    let status = if payload.quantity_value == 0 {
        "out-of-stock"
    } else {
        "available"
    };

    let product: Product = sqlx::query_as(
        r#"
        INSERT INTO products (id, name, category, image, price, quantity_value, quantity_unit, farmer_email, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(&payload.category)
    .bind(payload.image.as_deref().unwrap_or(""))
    .bind(payload.price)
    .bind(payload.quantity_value)
    .bind(&payload.quantity_unit)
    .bind(&payload.farmer_email)
    .bind(status)
    .fetch_one(&state.pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Product created",
            product,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let (page, limit, offset) = pagination.normalize();
    let items = sqlx::query_as::<_, Product>(
        "SELECT * FROM products ORDER BY created_at LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(&state.pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/recommended/{email}",
    params(
        ("email" = String, Path, description = "User email; must match the token")
    ),
    responses(
        (status = 200, description = "Catalog ranked by category preference", body = ApiResponse<ProductList>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Email does not match the token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn recommended_products(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    if user.email != email {
        return Err(AppError::Forbidden);
    }

    let items = recommendation_service::recommend(&state.pool, &email).await?;
    Ok(Json(ApiResponse::success(
        "Recommended products",
        ProductList { items },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/farmer/{email}",
    params(
        ("email" = String, Path, description = "Farmer email")
    ),
    responses(
        (status = 200, description = "Listings owned by a farmer", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_farmer_products(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let items = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE farmer_email = $1 ORDER BY created_at",
    )
    .bind(&email)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let result = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(Json(ApiResponse::success("Product", result, None)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let existing = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if let Some(category) = payload.category.as_deref() {
        if !CATEGORIES.contains(&category) {
            return Err(AppError::BadRequest(format!(
                "category must be one of: {}",
                CATEGORIES.join(", ")
            )));
        }
    }

    let name = payload.name.unwrap_or(existing.name);
    let category = payload.category.unwrap_or(existing.category);
    let image = payload.image.unwrap_or(existing.image);
    let price = payload.price.unwrap_or(existing.price);
    let quantity_value = payload.quantity_value.unwrap_or(existing.quantity_value);
    let quantity_unit = payload.quantity_unit.unwrap_or(existing.quantity_unit);
    if quantity_value < 0 {
        return Err(AppError::BadRequest(
            "quantity must not be negative".to_string(),
        ));
    }
    let status = if quantity_value == 0 {
        "out-of-stock"
    } else {
        "available"
    };

    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET name = $2, category = $3, image = $4, price = $5,
            quantity_value = $6, quantity_unit = $7, status = $8
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(category)
    .bind(image)
    .bind(price)
    .bind(quantity_value)
    .bind(quantity_unit)
    .bind(status)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success(
        "Updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
