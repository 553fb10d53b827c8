use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    models::Product,
};

/// Case-insensitive substring search over product names and categories.
/// Records the first match's category against the caller's preference
/// counters with a single atomic upsert.
pub async fn search_products(
    pool: &DbPool,
    user_email: &str,
    term: &str,
) -> AppResult<(Vec<Product>, Option<String>)> {
    let term = term.trim();
    if term.is_empty() {
        return Err(AppError::BadRequest("Search term is required".into()));
    }

    let pattern = format!("%{}%", term);
    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT * FROM products
        WHERE name ILIKE $1 OR category ILIKE $1
        ORDER BY created_at
        "#,
    )
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    if products.is_empty() {
        return Err(AppError::NotFound);
    }

    let tracked = products[0].category.clone();
    record_search(pool, user_email, &tracked).await?;

    Ok((products, Some(tracked)))
}

pub async fn record_search(pool: &DbPool, user_email: &str, category: &str) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO category_preferences (user_email, category, searches)
        VALUES ($1, $2, 1)
        ON CONFLICT (user_email, category)
        DO UPDATE SET searches = category_preferences.searches + 1
        "#,
    )
    .bind(user_email)
    .bind(category)
    .execute(pool)
    .await?;
    Ok(())
}

/// Full catalog, reordered by the caller's category preferences. With no
/// recorded preferences the catalog comes back in insertion order.
pub async fn recommend(pool: &DbPool, user_email: &str) -> AppResult<Vec<Product>> {
    let products =
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at")
            .fetch_all(pool)
            .await?;

    let ranking: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT category FROM category_preferences
        WHERE user_email = $1 AND searches > 0
        ORDER BY searches DESC, category
        "#,
    )
    .bind(user_email)
    .fetch_all(pool)
    .await?;

    if ranking.is_empty() {
        return Ok(products);
    }

    let ranked: Vec<String> = ranking.into_iter().map(|(c,)| c).collect();
    Ok(rank_by_preference(products, &ranked))
}

/// Stable reorder: products whose category ranks earlier sort first,
/// unranked categories last, original relative order preserved within each
/// group.
fn rank_by_preference(mut products: Vec<Product>, ranked_categories: &[String]) -> Vec<Product> {
    products.sort_by_key(|p| {
        ranked_categories
            .iter()
            .position(|c| c == &p.category)
            .unwrap_or(usize::MAX)
    });
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn product(name: &str, category: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.to_string(),
            image: String::new(),
            price: 100,
            quantity_value: 10,
            quantity_unit: "kg".to_string(),
            farmer_email: "farmer@example.com".to_string(),
            status: "available".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn ranked_categories_sort_first_preserving_relative_order() {
        // preferences {A:5, B:2, C:0} over [C, B, A, B, C]
        let products = vec![
            product("c1", "dairy"),
            product("b1", "fruits"),
            product("a1", "vegetables"),
            product("b2", "fruits"),
            product("c2", "dairy"),
        ];
        let ranked = vec!["vegetables".to_string(), "fruits".to_string()];

        let ordered = rank_by_preference(products, &ranked);
        let names: Vec<&str> = ordered.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a1", "b1", "b2", "c1", "c2"]);
    }

    #[test]
    fn no_ranking_keeps_original_order() {
        let products = vec![
            product("p1", "grains"),
            product("p2", "dairy"),
            product("p3", "grains"),
        ];
        let ordered = rank_by_preference(products, &[]);
        let names: Vec<&str> = ordered.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn unranked_categories_sort_last() {
        let products = vec![
            product("x", "others"),
            product("y", "seafood"),
            product("z", "others"),
        ];
        let ranked = vec!["seafood".to_string()];
        let ordered = rank_by_preference(products, &ranked);
        let names: Vec<&str> = ordered.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["y", "x", "z"]);
    }
}
