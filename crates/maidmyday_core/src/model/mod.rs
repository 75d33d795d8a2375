//! Domain model for household staff management.
//!
//! # Responsibility
//! - Define canonical records shared by stores, storage and FFI layers.
//! - Keep serialized field names aligned with the mobile UI snapshot shape.
//!
//! # Invariants
//! - Every record is identified by a stable string id.
//! - Timestamps are Unix epoch milliseconds.
//! - Generated ids are never reused for another record.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub mod chat;
pub mod notification;
pub mod schedule;
pub mod task;
pub(crate) mod timestamp;
pub mod user;

/// Milliseconds in one day, used by seed data and schedule windows.
pub const DAY_MS: i64 = 86_400_000;

/// Returns current wall-clock time in epoch milliseconds.
///
/// Falls back to `0` when the system clock is before the Unix epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// Generates a fresh record id with a readable kind prefix.
///
/// Example: `msg-2f1c0d1e4b6a4f1b9a3e0c7d5b8a9e10`.
pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::generate_id;

    #[test]
    fn generated_ids_carry_prefix_and_are_unique() {
        let first = generate_id("task");
        let second = generate_id("task");
        assert!(first.starts_with("task-"));
        assert_ne!(first, second);
    }
}
