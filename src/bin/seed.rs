use agrilinker_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let listings = [
        ("Fresh Tomatoes", "vegetables", 2500_i64, 120, "kg"),
        ("Red Lentils", "grains", 8000, 60, "kg"),
        ("Hilsa Fish", "seafood", 90000, 25, "kg"),
        ("Farm Eggs", "poultry", 1200, 300, "pieces"),
        ("Mangoes", "fruits", 5000, 80, "kg"),
        ("Raw Milk", "dairy", 6000, 40, "liters"),
    ];

    for (name, category, price, quantity, unit) in listings {
        seed_product(&pool, name, category, price, quantity, unit).await?;
    }

    println!("Seed completed: {} listings ensured.", listings.len());
    Ok(())
}

async fn seed_product(
    pool: &sqlx::PgPool,
    name: &str,
    category: &str,
    price: i64,
    quantity: i32,
    unit: &str,
) -> anyhow::Result<()> {
    let exists: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM products WHERE name = $1 AND farmer_email = $2")
            .bind(name)
            .bind("farmer@example.com")
            .fetch_optional(pool)
            .await?;
    if exists.is_some() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO products (id, name, category, image, price, quantity_value, quantity_unit, farmer_email, status)
        VALUES ($1, $2, $3, '', $4, $5, $6, $7, 'available')
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(category)
    .bind(price)
    .bind(quantity)
    .bind(unit)
    .bind("farmer@example.com")
    .execute(pool)
    .await?;

    Ok(())
}
