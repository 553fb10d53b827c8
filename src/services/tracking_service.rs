use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::tracking::TrackView,
    error::{AppError, AppResult},
    models::{OrderItem, OrderTrack, TrackEvent},
    status::OrderStatus,
};

pub async fn get_by_tracking_number(pool: &DbPool, tracking_number: &str) -> AppResult<TrackView> {
    let track: Option<OrderTrack> =
        sqlx::query_as("SELECT * FROM order_tracks WHERE tracking_number = $1")
            .bind(tracking_number)
            .fetch_optional(pool)
            .await?;
    match track {
        Some(track) => build_view(pool, track).await,
        None => Err(AppError::NotFound),
    }
}

pub async fn get_by_order_id(pool: &DbPool, order_id: &str) -> AppResult<TrackView> {
    let track: Option<OrderTrack> = sqlx::query_as("SELECT * FROM order_tracks WHERE order_id = $1")
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    match track {
        Some(track) => build_view(pool, track).await,
        None => Err(AppError::NotFound),
    }
}

/// The line items live in one snapshot table keyed by the shared order id;
/// the tracking view joins them instead of holding a second copy.
async fn build_view(pool: &DbPool, track: OrderTrack) -> AppResult<TrackView> {
    let items: Vec<OrderItem> = sqlx::query_as(
        r#"
        SELECT oi.* FROM order_items oi
        JOIN orders o ON o.id = oi.order_ref
        WHERE o.order_id = $1
        ORDER BY oi.created_at
        "#,
    )
    .bind(&track.order_id)
    .fetch_all(pool)
    .await?;

    let status_history: Vec<TrackEvent> = sqlx::query_as(
        "SELECT * FROM order_track_events WHERE track_id = $1 ORDER BY created_at",
    )
    .bind(track.id)
    .fetch_all(pool)
    .await?;

    Ok(TrackView {
        track,
        items,
        status_history,
    })
}

pub async fn list_for_buyer(pool: &DbPool, buyer_id: Uuid) -> AppResult<Vec<OrderTrack>> {
    let tracks = sqlx::query_as::<_, OrderTrack>(
        "SELECT * FROM order_tracks WHERE buyer_id = $1 ORDER BY created_at DESC",
    )
    .bind(buyer_id)
    .fetch_all(pool)
    .await?;
    Ok(tracks)
}

/// Appends a status to the history and mirrors it on the track record, in
/// one transaction. The transition is validated against the state machine;
/// unknown statuses and out-of-order moves are rejected.
pub async fn append_status(
    pool: &DbPool,
    tracking_number: &str,
    new_status: &str,
    note: Option<&str>,
) -> AppResult<OrderTrack> {
    let next = OrderStatus::parse(new_status)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown status: {new_status}")))?;

    let mut txn = pool.begin().await?;

    let track: Option<OrderTrack> =
        sqlx::query_as("SELECT * FROM order_tracks WHERE tracking_number = $1 FOR UPDATE")
            .bind(tracking_number)
            .fetch_optional(&mut *txn)
            .await?;
    let track = match track {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let current = OrderStatus::parse(&track.status)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("corrupt status: {}", track.status)))?;
    if !current.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "Invalid status transition: {} -> {}",
            current, next
        )));
    }

    let updated: OrderTrack =
        sqlx::query_as("UPDATE order_tracks SET status = $2 WHERE id = $1 RETURNING *")
            .bind(track.id)
            .bind(next.as_str())
            .fetch_one(&mut *txn)
            .await?;

    let note = note
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Status updated to {next}"));
    sqlx::query(
        "INSERT INTO order_track_events (id, track_id, status, note) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(track.id)
    .bind(next.as_str())
    .bind(&note)
    .execute(&mut *txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        tracking_number = %tracking_number,
        status = %next,
        "order status updated"
    );

    Ok(updated)
}
