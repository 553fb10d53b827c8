use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::CartList,
        loans::{CreateLoanRequest, CreatedLoan, LoanList},
        orders::{OrderList, OrderWithItems, PlacedOrder},
        products::ProductList,
        reviews::{PendingReviewList, ProductRating, ReviewList, SavePendingResponse},
        search::SearchResponse,
        tracking::{TrackList, TrackView, UpdateStatusRequest},
    },
    models::{CartItem, Loan, Order, OrderItem, OrderTrack, PendingReview, Product, Review, TrackEvent},
    response::{ApiResponse, Meta},
    routes::{admin, cart, health, loans, orders, params, products, reviews, search, tracking},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        cart::add_to_cart,
        cart::cart_list,
        cart::remove_from_cart,
        products::create_product,
        products::list_products,
        products::recommended_products,
        products::list_farmer_products,
        products::get_product,
        products::update_product,
        products::delete_product,
        orders::create_order,
        orders::list_user_orders,
        orders::get_order,
        tracking::track_by_number,
        tracking::track_by_order_id,
        tracking::user_order_history,
        tracking::update_status,
        reviews::save_pending,
        reviews::resolve_pending,
        reviews::submit_direct,
        reviews::list_pending,
        reviews::product_rating,
        reviews::product_reviews,
        search::search_product,
        loans::create_loan,
        loans::list_farmer_loans,
        admin::list_all_orders,
        admin::deliver_order,
        admin::cleanup_skipped_reviews
    ),
    components(
        schemas(
            Product,
            CartItem,
            Order,
            OrderItem,
            OrderTrack,
            TrackEvent,
            PendingReview,
            Review,
            Loan,
            CartList,
            ProductList,
            OrderList,
            OrderWithItems,
            PlacedOrder,
            TrackView,
            TrackList,
            UpdateStatusRequest,
            SavePendingResponse,
            PendingReviewList,
            ProductRating,
            ReviewList,
            SearchResponse,
            CreateLoanRequest,
            CreatedLoan,
            LoanList,
            admin::CleanupResult,
            params::Pagination,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<PlacedOrder>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<TrackView>,
            ApiResponse<SearchResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog and recommendations"),
        (name = "Cart", description = "Shopping cart endpoints"),
        (name = "Orders", description = "Order placement and history"),
        (name = "Order Tracking", description = "Shipment tracking endpoints"),
        (name = "Reviews", description = "Rating and review workflow"),
        (name = "Search", description = "Preference-tracked product search"),
        (name = "Loans", description = "Farmer loan requests"),
        (name = "Admin", description = "Fulfillment and maintenance endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
