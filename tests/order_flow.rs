use axum::{Json, extract::State};
use uuid::Uuid;

use agrilinker_api::{
    db::{DbPool, create_pool},
    dto::{cart::AddToCartRequest, reviews::ResolveReviewRequest, reviews::SubmitReviewRequest},
    error::AppError,
    middleware::auth::AuthUser,
    models::Product,
    routes::cart,
    services::{
        admin_service, order_service, recommendation_service, review_service, tracking_service,
    },
    state::AppState,
};

// Integration flow tests against a real Postgres; each test uses fresh
// UUIDs so they can run in parallel without truncation.
async fn setup_pool() -> anyhow::Result<Option<DbPool>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(Some(pool))
}

async fn create_product(
    pool: &DbPool,
    name: &str,
    category: &str,
    price: i64,
    quantity: i32,
) -> anyhow::Result<Product> {
    let product: Product = sqlx::query_as(
        r#"
        INSERT INTO products (id, name, category, image, price, quantity_value, quantity_unit, farmer_email, status)
        VALUES ($1, $2, $3, '', $4, $5, 'kg', $6, 'available')
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(category)
    .bind(price)
    .bind(quantity)
    .bind(format!("farmer-{}@example.com", Uuid::new_v4()))
    .fetch_one(pool)
    .await?;
    Ok(product)
}

async fn add_to_cart(
    pool: &DbPool,
    buyer_id: Uuid,
    product: &Product,
    quantity: i32,
) -> anyhow::Result<()> {
    let state = AppState { pool: pool.clone() };
    cart::add_to_cart(
        State(state),
        Json(AddToCartRequest {
            buyer_id,
            product_id: product.id,
            product_name: product.name.clone(),
            category: product.category.clone(),
            ordered_quantity: quantity,
            unit: Some(product.quantity_unit.clone()),
            price: Some(product.price),
            image: None,
        }),
    )
    .await
    .map_err(|e| anyhow::anyhow!("add_to_cart failed: {e}"))?;
    Ok(())
}

async fn stock_of(pool: &DbPool, product_id: Uuid) -> anyhow::Result<(i32, String)> {
    let row: (i32, String) =
        sqlx::query_as("SELECT quantity_value, status FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_one(pool)
            .await?;
    Ok(row)
}

async fn cart_len(pool: &DbPool, buyer_id: Uuid) -> anyhow::Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cart_items WHERE buyer_id = $1")
        .bind(buyer_id)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

#[tokio::test]
async fn checkout_creates_order_track_and_clears_cart() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let buyer_id = Uuid::new_v4();
    let product = create_product(&pool, "Checkout Tomatoes", "vegetables", 2500, 10).await?;

    // Duplicate add merges into a single line of 5.
    add_to_cart(&pool, buyer_id, &product, 2).await?;
    add_to_cart(&pool, buyer_id, &product, 3).await?;
    assert_eq!(cart_len(&pool, buyer_id).await?, 1);

    let resp = order_service::place_order(&pool, buyer_id).await?;
    let placed = resp.data.expect("placed order");

    assert_eq!(placed.order.total_price, 2500 * 5);
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].quantity, 5);
    assert!(placed.tracking_number.starts_with("ALK"));
    assert!(placed.order.order_id.starts_with("ORD"));

    // Stock decremented by exactly the ordered quantity, still available.
    let (stock, status) = stock_of(&pool, product.id).await?;
    assert_eq!(stock, 5);
    assert_eq!(status, "available");

    // Cart cleared exactly once.
    assert_eq!(cart_len(&pool, buyer_id).await?, 0);

    // Tracking record shares the order id, starts as Order Placed with a
    // one-entry history.
    let view = tracking_service::get_by_tracking_number(&pool, &placed.tracking_number).await?;
    assert_eq!(view.track.order_id, placed.order.order_id);
    assert_eq!(view.track.status, "Order Placed");
    assert_eq!(view.status_history.len(), 1);
    assert_eq!(view.status_history[0].status, "Order Placed");
    assert_eq!(view.items.len(), 1);

    let by_order = tracking_service::get_by_order_id(&pool, &placed.order.order_id).await?;
    assert_eq!(by_order.track.tracking_number, placed.tracking_number);

    // One incomplete pending review per line item.
    let pending = review_service::list_pending_for_user(&pool, buyer_id).await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, "incomplete");
    assert_eq!(pending[0].order_id, placed.order.order_id);

    Ok(())
}

#[tokio::test]
async fn failed_checkout_leaves_cart_and_stock_untouched() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let buyer_id = Uuid::new_v4();
    let scarce = create_product(&pool, "Scarce Mangoes", "fruits", 5000, 1).await?;
    let plenty = create_product(&pool, "Plenty Lentils", "grains", 8000, 50).await?;

    add_to_cart(&pool, buyer_id, &plenty, 3).await?;
    add_to_cart(&pool, buyer_id, &scarce, 2).await?;

    let err = order_service::place_order(&pool, buyer_id)
        .await
        .expect_err("expected insufficient stock");
    assert!(matches!(err, AppError::InsufficientStock(_)));

    // The whole transaction rolled back: no partial decrement on the
    // earlier line, cart intact, no order or track records.
    assert_eq!(stock_of(&pool, plenty.id).await?.0, 50);
    assert_eq!(stock_of(&pool, scarce.id).await?.0, 1);
    assert_eq!(cart_len(&pool, buyer_id).await?, 2);

    let orders: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE buyer_id = $1")
        .bind(buyer_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(orders.0, 0);

    Ok(())
}

#[tokio::test]
async fn empty_cart_checkout_is_rejected() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let err = order_service::place_order(&pool, Uuid::new_v4())
        .await
        .expect_err("expected empty cart error");
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn draining_stock_flips_product_out_of_stock() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let buyer_id = Uuid::new_v4();
    let product = create_product(&pool, "Last Eggs", "poultry", 1200, 2).await?;

    add_to_cart(&pool, buyer_id, &product, 2).await?;
    order_service::place_order(&pool, buyer_id).await?;

    let (stock, status) = stock_of(&pool, product.id).await?;
    assert_eq!(stock, 0);
    assert_eq!(status, "out-of-stock");
    Ok(())
}

#[tokio::test]
async fn pending_review_resolves_exactly_once() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let buyer_id = Uuid::new_v4();
    let product = create_product(&pool, "Reviewed Milk", "dairy", 6000, 10).await?;

    add_to_cart(&pool, buyer_id, &product, 1).await?;
    order_service::place_order(&pool, buyer_id).await?;

    let pending = review_service::list_pending_for_user(&pool, buyer_id).await?;
    let pending_id = pending[0].id;

    let resolved = review_service::resolve_pending(
        &pool,
        pending_id,
        ResolveReviewRequest {
            status: "complete".into(),
            rating: Some(5),
            review: Some("Very fresh".into()),
        },
    )
    .await?;
    assert_eq!(resolved.status, "complete");
    assert_eq!(resolved.rating, Some(5));

    let rating = review_service::product_rating(&pool, product.id).await?;
    assert_eq!(rating.average_rating, 5.0);
    assert_eq!(rating.review_count, 1);

    // Second resolution of the same row is rejected, no duplicate review.
    let err = review_service::resolve_pending(
        &pool,
        pending_id,
        ResolveReviewRequest {
            status: "complete".into(),
            rating: Some(1),
            review: None,
        },
    )
    .await
    .expect_err("expected already-resolved rejection");
    assert!(matches!(err, AppError::BadRequest(_)));

    // The direct path carries the same (user, product) duplicate guard.
    let err = review_service::submit_direct(
        &pool,
        SubmitReviewRequest {
            user_id: buyer_id,
            product_id: product.id,
            rating: 2,
            review: None,
        },
    )
    .await
    .expect_err("expected duplicate review rejection");
    assert!(matches!(err, AppError::Conflict(_)));

    let rating = review_service::product_rating(&pool, product.id).await?;
    assert_eq!(rating.review_count, 1);

    Ok(())
}

#[tokio::test]
async fn skipping_a_pending_review_records_no_permanent_review() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let buyer_id = Uuid::new_v4();
    let product = create_product(&pool, "Skipped Hilsa", "seafood", 90000, 5).await?;

    add_to_cart(&pool, buyer_id, &product, 1).await?;
    order_service::place_order(&pool, buyer_id).await?;

    let pending = review_service::list_pending_for_user(&pool, buyer_id).await?;
    let resolved = review_service::resolve_pending(
        &pool,
        pending[0].id,
        ResolveReviewRequest {
            status: "skipped".into(),
            rating: None,
            review: None,
        },
    )
    .await?;
    assert_eq!(resolved.status, "skipped");
    assert_eq!(resolved.rating, None);

    let rating = review_service::product_rating(&pool, product.id).await?;
    assert_eq!(rating.average_rating, 0.0);
    assert_eq!(rating.review_count, 0);

    Ok(())
}

#[tokio::test]
async fn status_updates_follow_the_state_machine() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let buyer_id = Uuid::new_v4();
    let product = create_product(&pool, "Tracked Rice", "grains", 3500, 20).await?;

    add_to_cart(&pool, buyer_id, &product, 2).await?;
    let resp = order_service::place_order(&pool, buyer_id).await?;
    let tracking_number = resp.data.expect("placed order").tracking_number;

    // Skipping straight to Delivered is rejected.
    let err = tracking_service::append_status(&pool, &tracking_number, "Delivered", None)
        .await
        .expect_err("expected invalid transition");
    assert!(matches!(err, AppError::BadRequest(_)));

    // Arbitrary strings are rejected.
    let err = tracking_service::append_status(&pool, &tracking_number, "On The Way", None)
        .await
        .expect_err("expected unknown status");
    assert!(matches!(err, AppError::BadRequest(_)));

    tracking_service::append_status(&pool, &tracking_number, "Confirmed", None).await?;
    tracking_service::append_status(&pool, &tracking_number, "Shipped", None).await?;
    let track =
        tracking_service::append_status(&pool, &tracking_number, "Delivered", Some("Handed over"))
            .await?;
    assert_eq!(track.status, "Delivered");

    // Status always mirrors the newest history entry.
    let view = tracking_service::get_by_tracking_number(&pool, &tracking_number).await?;
    assert_eq!(view.status_history.len(), 4);
    assert_eq!(view.status_history.last().unwrap().status, "Delivered");
    assert_eq!(view.status_history.last().unwrap().note, "Handed over");
    assert_eq!(view.track.status, "Delivered");

    Ok(())
}

#[tokio::test]
async fn mark_delivered_flips_order_even_when_track_lags() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let buyer_id = Uuid::new_v4();
    let admin = AuthUser {
        user_id: Uuid::new_v4(),
        email: "admin@example.com".into(),
        role: "admin".into(),
    };
    let product = create_product(&pool, "Delivered Onions", "vegetables", 4000, 10).await?;

    add_to_cart(&pool, buyer_id, &product, 1).await?;
    let resp = order_service::place_order(&pool, buyer_id).await?;
    let placed = resp.data.expect("placed order");

    // Track is still at Order Placed; the Delivered append fails the state
    // machine and is only logged, but the order side must still flip.
    let order = admin_service::mark_delivered(&pool, &admin, &placed.order.order_id).await?;
    assert!(order.delivered);
    assert!(order.delivered_at.is_some());

    let view = tracking_service::get_by_order_id(&pool, &placed.order.order_id).await?;
    assert_eq!(view.track.status, "Order Placed");

    // A non-admin caller is refused.
    let buyer = AuthUser {
        user_id: buyer_id,
        email: "buyer@example.com".into(),
        role: "user".into(),
    };
    let err = admin_service::mark_delivered(&pool, &buyer, &placed.order.order_id)
        .await
        .expect_err("expected forbidden");
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn search_records_first_match_category_and_biases_recommendations() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let email = format!("buyer-{}@example.com", Uuid::new_v4());
    let marker = Uuid::new_v4().simple().to_string();

    let fruit = create_product(&pool, &format!("Banana {marker}"), "fruits", 2500, 30).await?;
    let grain = create_product(&pool, &format!("Wheat {marker}"), "grains", 3000, 30).await?;

    let (products, tracked) =
        recommendation_service::search_products(&pool, &email, &format!("banana {marker}")).await?;
    assert_eq!(products.len(), 1);
    assert_eq!(tracked.as_deref(), Some("fruits"));

    let prefs: (i32,) = sqlx::query_as(
        "SELECT searches FROM category_preferences WHERE user_email = $1 AND category = 'fruits'",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await?;
    assert_eq!(prefs.0, 1);

    // A search with no matches is a 404 and records nothing.
    let err = recommendation_service::search_products(&pool, &email, "no-such-product-zzz")
        .await
        .expect_err("expected not found");
    assert!(matches!(err, AppError::NotFound));

    // The preferred category ranks ahead of unranked ones, insertion order
    // otherwise preserved.
    let recommended = recommendation_service::recommend(&pool, &email).await?;
    let mine: Vec<Uuid> = recommended
        .iter()
        .filter(|p| p.id == fruit.id || p.id == grain.id)
        .map(|p| p.id)
        .collect();
    assert_eq!(mine, vec![fruit.id, grain.id]);

    Ok(())
}
