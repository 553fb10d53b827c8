use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::reviews::{PendingItem, ProductRating, ResolveReviewRequest, SubmitReviewRequest},
    error::{AppError, AppResult, is_unique_violation},
    models::{CartItem, PendingReview, Review},
};

/// Seeds one incomplete pending-review row per checkout line, inside the
/// checkout transaction.
pub async fn seed_pending_reviews(
    txn: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: Uuid,
    order_id: &str,
    lines: &[CartItem],
) -> AppResult<()> {
    for line in lines {
        sqlx::query(
            r#"
            INSERT INTO pending_reviews (id, user_id, product_id, product_name, order_id, image, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (order_id, product_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(order_id)
        .bind(&line.image)
        .bind(&line.category)
        .execute(&mut **txn)
        .await?;
    }
    Ok(())
}

/// Standalone seeding path for the save-pending endpoint; idempotent per
/// (order, product) pair.
pub async fn save_pending(
    pool: &DbPool,
    user_id: Uuid,
    order_id: &str,
    items: &[PendingItem],
) -> AppResult<usize> {
    let mut count = 0;
    for item in items {
        let result = sqlx::query(
            r#"
            INSERT INTO pending_reviews (id, user_id, product_id, product_name, order_id, image, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (order_id, product_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(order_id)
        .bind(item.image.as_deref().unwrap_or(""))
        .bind(item.category.as_deref().unwrap_or(""))
        .execute(pool)
        .await?;
        count += result.rows_affected() as usize;
    }
    Ok(count)
}

/// Resolves a pending review exactly once: either into a permanent review
/// (rating required) or a skip. A second resolution attempt is rejected,
/// as is a duplicate (user, product) permanent review.
pub async fn resolve_pending(
    pool: &DbPool,
    review_id: Uuid,
    payload: ResolveReviewRequest,
) -> AppResult<PendingReview> {
    let mut txn = pool.begin().await?;

    let pending: Option<PendingReview> =
        sqlx::query_as("SELECT * FROM pending_reviews WHERE id = $1 FOR UPDATE")
            .bind(review_id)
            .fetch_optional(&mut *txn)
            .await?;
    let pending = match pending {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if pending.status != "incomplete" {
        return Err(AppError::BadRequest(format!(
            "Review already resolved as {}",
            pending.status
        )));
    }

    let resolved = match payload.status.as_str() {
        "complete" => {
            let rating = payload
                .rating
                .ok_or_else(|| AppError::BadRequest("Rating is required".into()))?;
            if !(1..=5).contains(&rating) {
                return Err(AppError::BadRequest("Rating must be between 1 and 5".into()));
            }
            let review_text = payload.review.unwrap_or_default();

            sqlx::query(
                r#"
                INSERT INTO reviews (id, user_id, product_id, rating, review)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(pending.user_id)
            .bind(pending.product_id)
            .bind(rating)
            .bind(&review_text)
            .execute(&mut *txn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AppError::Conflict("You have already reviewed this product".into())
                } else {
                    AppError::DbError(err)
                }
            })?;

            sqlx::query_as::<_, PendingReview>(
                r#"
                UPDATE pending_reviews
                SET status = 'complete', rating = $2, review = $3, updated_at = now()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(review_id)
            .bind(rating)
            .bind(&review_text)
            .fetch_one(&mut *txn)
            .await?
        }
        "skipped" => {
            sqlx::query_as::<_, PendingReview>(
                r#"
                UPDATE pending_reviews
                SET status = 'skipped', updated_at = now()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(review_id)
            .fetch_one(&mut *txn)
            .await?
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "Status must be complete or skipped, got {other}"
            )));
        }
    };

    txn.commit().await?;
    Ok(resolved)
}

/// Legacy direct-submission path. Carries the same duplicate guard as the
/// pending-resolution path.
pub async fn submit_direct(pool: &DbPool, payload: SubmitReviewRequest) -> AppResult<Review> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest("Rating must be between 1 and 5".into()));
    }

    let review: Review = sqlx::query_as(
        r#"
        INSERT INTO reviews (id, user_id, product_id, rating, review)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.user_id)
    .bind(payload.product_id)
    .bind(payload.rating)
    .bind(payload.review.unwrap_or_default())
    .fetch_one(pool)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::Conflict("You have already reviewed this product".into())
        } else {
            AppError::DbError(err)
        }
    })?;

    Ok(review)
}

pub async fn product_rating(pool: &DbPool, product_id: Uuid) -> AppResult<ProductRating> {
    let (sum, count): (Option<i64>, i64) =
        sqlx::query_as("SELECT SUM(rating), COUNT(*) FROM reviews WHERE product_id = $1")
            .bind(product_id)
            .fetch_one(pool)
            .await?;

    Ok(ProductRating {
        average_rating: round_average(sum.unwrap_or(0), count),
        review_count: count,
    })
}

pub async fn product_reviews(pool: &DbPool, product_id: Uuid) -> AppResult<(Vec<Review>, f64)> {
    let reviews = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE product_id = $1 ORDER BY created_at DESC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    let sum: i64 = reviews.iter().map(|r| r.rating as i64).sum();
    let average = round_average(sum, reviews.len() as i64);
    Ok((reviews, average))
}

pub async fn list_pending_for_user(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<PendingReview>> {
    let rows = sqlx::query_as::<_, PendingReview>(
        "SELECT * FROM pending_reviews WHERE user_id = $1 AND status = 'incomplete' ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Purges skipped pending-review rows whose last update precedes the
/// cutoff. Returns the number of rows removed.
pub async fn cleanup_skipped(pool: &DbPool, older_than: DateTime<Utc>) -> AppResult<u64> {
    let result =
        sqlx::query("DELETE FROM pending_reviews WHERE status = 'skipped' AND updated_at < $1")
            .bind(older_than)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

/// Arithmetic mean rounded to one decimal; {0, 0} when no reviews exist.
fn round_average(sum: i64, count: i64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let mean = sum as f64 / count as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::round_average;

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(round_average(0, 0), 0.0);
        assert_eq!(round_average(5, 1), 5.0);
        assert_eq!(round_average(10, 3), 3.3);
        assert_eq!(round_average(11, 3), 3.7);
        assert_eq!(round_average(7, 2), 3.5);
    }
}
