use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::orders::PlacedOrder,
    error::{AppError, AppResult},
    ids::{new_order_id, new_tracking_number},
    models::{CartItem, Order, OrderItem},
    response::{ApiResponse, Meta},
    services::review_service,
    status::OrderStatus,
};

/// Converts the buyer's cart into an order, its tracking record and the
/// pending-review rows, decrements stock and clears the cart — all in one
/// database transaction, so a failure partway through leaves nothing
/// applied.
pub async fn place_order(pool: &DbPool, buyer_id: Uuid) -> AppResult<ApiResponse<PlacedOrder>> {
    let mut txn = pool.begin().await?;

    let lines: Vec<CartItem> =
        sqlx::query_as("SELECT * FROM cart_items WHERE buyer_id = $1 ORDER BY created_at")
            .bind(buyer_id)
            .fetch_all(&mut *txn)
            .await?;

    if lines.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let total_price: i64 = lines.iter().map(|l| l.price * l.quantity as i64).sum();

    for line in &lines {
        decrement_stock(&mut txn, line).await?;
    }

    let order_id = new_order_id();
    let tracking_number = new_tracking_number();

    let order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders (id, order_id, buyer_id, total_price, delivered)
        VALUES ($1, $2, $3, $4, FALSE)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&order_id)
    .bind(buyer_id)
    .bind(total_price)
    .fetch_one(&mut *txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(lines.len());
    for line in &lines {
        let item: OrderItem = sqlx::query_as(
            r#"
            INSERT INTO order_items (id, order_ref, product_id, product_name, quantity, unit, price, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order.id)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(line.quantity)
        .bind(&line.unit)
        .bind(line.price)
        .bind(&line.image)
        .fetch_one(&mut *txn)
        .await?;
        items.push(item);
    }

    // Tracking projection, written in the same transaction so the two
    // views of the checkout cannot drift.
    let track_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO order_tracks (id, tracking_number, order_id, buyer_id, total_amount, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(track_id)
    .bind(&tracking_number)
    .bind(&order_id)
    .bind(buyer_id)
    .bind(total_price)
    .bind(OrderStatus::Placed.as_str())
    .execute(&mut *txn)
    .await?;

    sqlx::query(
        "INSERT INTO order_track_events (id, track_id, status, note) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(track_id)
    .bind(OrderStatus::Placed.as_str())
    .bind("Order successfully placed")
    .execute(&mut *txn)
    .await?;

    review_service::seed_pending_reviews(&mut txn, buyer_id, &order_id, &lines).await?;

    sqlx::query("DELETE FROM cart_items WHERE buyer_id = $1")
        .bind(buyer_id)
        .execute(&mut *txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order_id,
        tracking_number = %tracking_number,
        buyer_id = %buyer_id,
        total_price,
        "order placed"
    );

    Ok(ApiResponse::success(
        "Order placed successfully!",
        PlacedOrder {
            order,
            items,
            tracking_number,
        },
        Some(Meta::empty()),
    ))
}

/// Single conditional decrement per product: the stock check and the write
/// happen in one statement, so concurrent checkouts cannot both pass the
/// check and oversell.
async fn decrement_stock(
    txn: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    line: &CartItem,
) -> AppResult<()> {
    let updated = sqlx::query(
        r#"
        UPDATE products
        SET quantity_value = quantity_value - $2,
            status = CASE WHEN quantity_value - $2 <= 0 THEN 'out-of-stock' ELSE 'available' END
        WHERE id = $1 AND quantity_value >= $2
        "#,
    )
    .bind(line.product_id)
    .bind(line.quantity)
    .execute(&mut **txn)
    .await?;

    if updated.rows_affected() == 0 {
        let available: Option<(i32, String)> =
            sqlx::query_as("SELECT quantity_value, quantity_unit FROM products WHERE id = $1")
                .bind(line.product_id)
                .fetch_optional(&mut **txn)
                .await?;
        return match available {
            None => Err(AppError::BadRequest(format!(
                "Product not found: {}",
                line.product_name
            ))),
            Some((value, unit)) => Err(AppError::InsufficientStock(format!(
                "{}. Available: {} {}",
                line.product_name, value, unit
            ))),
        };
    }
    Ok(())
}

pub async fn get_order(pool: &DbPool, order_id: &str) -> AppResult<(Order, Vec<OrderItem>)> {
    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE order_id = $1")
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_ref = $1 ORDER BY created_at",
    )
    .bind(order.id)
    .fetch_all(pool)
    .await?;

    Ok((order, items))
}
