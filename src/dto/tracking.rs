use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{OrderItem, OrderTrack, TrackEvent};

/// Buyer-facing tracking view: the track record plus the line-item
/// snapshot joined through the shared order id and the full history.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackView {
    pub track: OrderTrack,
    pub items: Vec<OrderItem>,
    pub status_history: Vec<TrackEvent>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackList {
    pub items: Vec<OrderTrack>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub note: Option<String>,
}
