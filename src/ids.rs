use chrono::Utc;
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_CHARSET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Human-readable order identifier, e.g. `ORD1756449930123`.
///
/// Uniqueness is best-effort from the millisecond timestamp; the unique
/// index on orders.order_id is the backstop under concurrent checkouts.
pub fn new_order_id() -> String {
    format!("ORD{}", Utc::now().timestamp_millis())
}

/// Public tracking number, e.g. `ALKmewz1x2aB3CD`: base-36 millis plus a
/// short random suffix.
pub fn new_tracking_number() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..5)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();
    format!("ALK{}{}", to_base36(Utc::now().timestamp_millis()), suffix)
}

fn to_base36(mut n: i64) -> String {
    if n <= 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_has_prefix_and_numeric_body() {
        let id = new_order_id();
        assert!(id.starts_with("ORD"));
        assert!(id[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn tracking_number_has_prefix_and_random_suffix() {
        let tn = new_tracking_number();
        assert!(tn.starts_with("ALK"));
        // base36 millis (currently 8-9 chars) + 5 suffix chars
        assert!(tn.len() >= 3 + 8 + 5);
        assert!(tn[3..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tracking_numbers_differ_across_calls() {
        let a = new_tracking_number();
        let b = new_tracking_number();
        assert_ne!(a, b);
    }

    #[test]
    fn base36_round_trip() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36 + 1), "101");
    }
}
