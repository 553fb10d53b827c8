pub mod cart;
pub mod loans;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod search;
pub mod tracking;
