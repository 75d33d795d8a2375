//! Repository layer over local device storage.
//!
//! # Responsibility
//! - Define the key/value contract stores persist their snapshots through.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Repositories only accept connections with the latest schema applied.
//! - Malformed persisted JSON surfaces as `RepoError::InvalidData`.

pub mod kv_repo;
