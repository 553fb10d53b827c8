pub mod admin_service;
pub mod order_service;
pub mod recommendation_service;
pub mod review_service;
pub mod tracking_service;
