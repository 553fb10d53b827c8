use crate::{
    db::DbPool,
    dto::orders::OrderList,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::tracking_service,
};

pub async fn list_all_orders(
    pool: &DbPool,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;

    let (page, limit, offset) = pagination.normalize();
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders ORDER BY ordered_date DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

/// Flips the delivered flag on the order, then best-effort appends a
/// Delivered status to the matching track. A missing track or a rejected
/// transition is logged and does not undo the delivery.
pub async fn mark_delivered(pool: &DbPool, user: &AuthUser, order_id: &str) -> AppResult<Order> {
    ensure_admin(user)?;

    let order: Option<Order> = sqlx::query_as(
        r#"
        UPDATE orders
        SET delivered = TRUE, delivered_at = now()
        WHERE order_id = $1
        RETURNING *
        "#,
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let track: Option<(String,)> =
        sqlx::query_as("SELECT tracking_number FROM order_tracks WHERE order_id = $1")
            .bind(order_id)
            .fetch_optional(pool)
            .await?;

    match track {
        Some((tracking_number,)) => {
            if let Err(err) = tracking_service::append_status(
                pool,
                &tracking_number,
                "Delivered",
                Some("Marked delivered by fulfillment staff"),
            )
            .await
            {
                tracing::warn!(
                    order_id = %order_id,
                    error = %err,
                    "delivered on order record but status append failed"
                );
            }
        }
        None => {
            tracing::warn!(order_id = %order_id, "no tracking record for delivered order");
        }
    }

    Ok(order)
}
