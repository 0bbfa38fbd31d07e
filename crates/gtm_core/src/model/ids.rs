//! Entity id allocation.
//!
//! Ids are the base-36 wall-clock millisecond time followed by a random
//! suffix. Uniqueness is probabilistic: two ids minted in the same
//! millisecond collide only if their suffixes do.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Opaque record identifier, unique within one collection.
pub type EntityId = String;

const ID_SUFFIX_LEN: usize = 9;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Mints a fresh id for a record created at `now`.
pub fn new_entity_id(now: DateTime<Utc>) -> EntityId {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let random = Uuid::new_v4().simple().to_string();
    format!("{}{}", to_base36(millis), &random[..ID_SUFFIX_LEN])
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(char::from(BASE36_DIGITS[(value % 36) as usize]));
        value /= 36;
    }
    digits.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::{new_entity_id, to_base36};
    use chrono::{TimeZone, Utc};

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn ids_share_time_prefix_and_differ_in_suffix() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let first = new_entity_id(now);
        let second = new_entity_id(now);
        let prefix = to_base36(now.timestamp_millis() as u64);

        assert!(first.starts_with(&prefix));
        assert_eq!(first.len(), prefix.len() + 9);
        assert_ne!(first, second);
    }
}
