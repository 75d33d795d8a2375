//! User model.
//!
//! Users are immutable seed data; registration creates an in-session user
//! that is only persisted as part of the auth session snapshot.

use serde::{Deserialize, Serialize};

/// Stable identifier for users (`user1`, `user2`, ...).
pub type UserId = String;

/// Household role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Household owner who assigns work.
    Owner,
    /// Staff member who receives tasks.
    Staff,
}

/// Household member account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    pub fn is_staff(&self) -> bool {
        self.role == UserRole::Staff
    }
}
