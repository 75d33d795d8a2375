//! Store services: the use-case layer the mobile screens call into.
//!
//! # Responsibility
//! - Own one entity list per store and apply CRUD/reconciliation rules.
//! - Persist snapshots through `KvRepository` on a best-effort basis.
//! - Keep a flat, user-facing error string per store next to typed errors.
//!
//! # Invariants
//! - Stores are mutated only through `&mut self` (single writer).
//! - Storage failures never fail a store operation; they are logged.
//!
//! # See also
//! - `crate::repo::kv_repo`

use std::time::Duration;

pub mod app_stores;
pub mod auth_service;
pub mod chat_service;
pub mod dashboard;
pub mod notification_service;
pub mod schedule_service;
pub mod task_service;

/// Upper bound of conversations kept in a persisted chat snapshot.
pub const MAX_PERSISTED_CONVERSATIONS: usize = 1_000;
/// Upper bound of messages kept in a persisted chat snapshot.
pub const MAX_PERSISTED_MESSAGES: usize = 10_000;

/// Runtime knobs shared by every store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Artificial delay applied before each remote-looking operation.
    pub simulated_latency: Duration,
    pub max_persisted_conversations: usize,
    pub max_persisted_messages: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            simulated_latency: Duration::ZERO,
            max_persisted_conversations: MAX_PERSISTED_CONVERSATIONS,
            max_persisted_messages: MAX_PERSISTED_MESSAGES,
        }
    }
}

impl StoreConfig {
    /// Config mimicking the mobile prototype's fake network round trips.
    pub fn with_latency(simulated_latency: Duration) -> Self {
        Self {
            simulated_latency,
            ..Self::default()
        }
    }

    /// Blocks for the configured artificial latency.
    pub(crate) fn simulate_latency(&self) {
        if !self.simulated_latency.is_zero() {
            std::thread::sleep(self.simulated_latency);
        }
    }
}

/// Keeps only the newest `cap` entries of an insertion-ordered list.
pub(crate) fn keep_newest<T>(items: &[T], cap: usize) -> &[T] {
    let start = items.len().saturating_sub(cap);
    &items[start..]
}

#[cfg(test)]
mod tests {
    use super::keep_newest;

    #[test]
    fn keep_newest_drops_oldest_entries() {
        let items = [1, 2, 3, 4];
        assert_eq!(keep_newest(&items, 2), &[3, 4]);
        assert_eq!(keep_newest(&items, 10), &[1, 2, 3, 4]);
    }
}
