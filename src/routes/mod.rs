use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod cart;
pub mod doc;
pub mod health;
pub mod loans;
pub mod orders;
pub mod params;
pub mod products;
pub mod reviews;
pub mod search;
pub mod tracking;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/ordertrack", tracking::router())
        .nest("/rating-review", reviews::router())
        .nest("/loans", loans::router())
        .nest("/admin", admin::router())
        .merge(search::router())
}
