use std::fmt;

/// Shipment status for a tracked order. Transitions are enforced: a status
/// update must move forward along the allowed edges, arbitrary strings and
/// skipped states are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Placed,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Order Placed",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "order placed" | "placed" => Some(OrderStatus::Placed),
            "confirmed" => Some(OrderStatus::Confirmed),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Placed, Confirmed)
                | (Placed, Cancelled)
                | (Confirmed, Shipped)
                | (Confirmed, Cancelled)
                | (Shipped, Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;
    use super::*;

    #[test]
    fn parse_accepts_known_statuses_case_insensitively() {
        assert_eq!(OrderStatus::parse("Order Placed"), Some(Placed));
        assert_eq!(OrderStatus::parse("placed"), Some(Placed));
        assert_eq!(OrderStatus::parse("SHIPPED"), Some(Shipped));
        assert_eq!(OrderStatus::parse(" delivered "), Some(Delivered));
        assert_eq!(OrderStatus::parse("On The Way"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(Placed.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Placed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
    }

    #[test]
    fn skipped_repeated_and_backward_transitions_are_rejected() {
        assert!(!Placed.can_transition_to(Shipped));
        assert!(!Placed.can_transition_to(Delivered));
        assert!(!Confirmed.can_transition_to(Placed));
        assert!(!Shipped.can_transition_to(Shipped));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Confirmed));
    }
}
