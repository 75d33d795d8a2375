//! Notification model.

use serde::{Deserialize, Serialize};

pub type NotificationId = String;

/// Source category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Task,
    Message,
    Schedule,
    System,
}

/// In-app notification entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    #[serde(with = "crate::model::timestamp")]
    pub timestamp: i64,
    pub read: bool,
    /// Serialized as `type` to match the UI snapshot shape.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Id of the task, conversation or schedule this entry points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
}

/// Caller-provided fields for a new notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub related_id: Option<String>,
}
