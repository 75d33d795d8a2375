//! Notification store.
//!
//! # Responsibility
//! - Track in-app notifications and their read state.
//! - Provide unread counts and the recent list shown on the dashboard.

use crate::model::notification::{NewNotification, Notification};
use crate::model::{generate_id, now_epoch_ms};
use crate::repo::kv_repo::{storage_keys, KvRepository};
use crate::seed;
use crate::service::StoreConfig;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Entries returned by `recent_notifications`.
pub const RECENT_NOTIFICATIONS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    EmptyTitle,
}

impl Display for NotificationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "notification title must not be blank"),
        }
    }
}

impl Error for NotificationError {}

/// Notification store over a key/value repository.
pub struct NotificationService<R: KvRepository> {
    repo: R,
    config: StoreConfig,
    notifications: Vec<Notification>,
    last_error: Option<String>,
}

impl<R: KvRepository> NotificationService<R> {
    pub fn new(repo: R, config: StoreConfig) -> Self {
        let notifications =
            match repo.load_json::<Vec<Notification>>(storage_keys::NOTIFICATIONS) {
                Ok(Some(stored)) => stored,
                Ok(None) => seed::notifications(now_epoch_ms()),
                Err(err) => {
                    warn!("event=storage_restore module=notification status=error error={err}");
                    seed::notifications(now_epoch_ms())
                }
            };
        Self {
            repo,
            config,
            notifications,
            last_error: None,
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn fetch_notifications(&mut self) {
        self.last_error = None;
        self.config.simulate_latency();
        self.notifications = seed::notifications(now_epoch_ms());
        self.persist();
    }

    /// Records a new unread notification.
    pub fn add_notification(
        &mut self,
        draft: NewNotification,
    ) -> Result<Notification, NotificationError> {
        self.last_error = None;
        if draft.title.trim().is_empty() {
            self.last_error = Some("Failed to add notification".to_string());
            return Err(NotificationError::EmptyTitle);
        }

        let notification = Notification {
            id: generate_id("notif"),
            title: draft.title.trim().to_string(),
            message: draft.message,
            timestamp: now_epoch_ms(),
            read: false,
            kind: draft.kind,
            related_id: draft.related_id,
        };
        self.notifications.push(notification.clone());
        self.persist();
        info!(
            "event=notification_add module=notification status=ok notification_id={}",
            notification.id
        );
        Ok(notification)
    }

    /// Marks one notification read; returns whether it exists.
    pub fn mark_as_read(&mut self, notification_id: &str) -> bool {
        self.last_error = None;
        self.config.simulate_latency();
        let Some(notification) = self
            .notifications
            .iter_mut()
            .find(|notification| notification.id == notification_id)
        else {
            return false;
        };
        notification.read = true;
        self.persist();
        true
    }

    pub fn mark_all_as_read(&mut self) {
        self.last_error = None;
        self.config.simulate_latency();
        for notification in &mut self.notifications {
            notification.read = true;
        }
        self.persist();
    }

    /// Removes one notification; returns whether it existed.
    pub fn clear_notification(&mut self, notification_id: &str) -> bool {
        self.last_error = None;
        self.config.simulate_latency();
        let before = self.notifications.len();
        self.notifications
            .retain(|notification| notification.id != notification_id);
        let removed = self.notifications.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn clear_all_notifications(&mut self) {
        self.last_error = None;
        self.config.simulate_latency();
        self.notifications.clear();
        self.persist();
    }

    pub fn unread_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|notification| !notification.read)
            .count()
    }

    /// Unread notifications in list order, at most `limit`.
    pub fn unread_notifications(&self, limit: usize) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|notification| !notification.read)
            .take(limit)
            .collect()
    }

    /// Newest notifications first, capped at `RECENT_NOTIFICATIONS_LIMIT`.
    pub fn recent_notifications(&self) -> Vec<&Notification> {
        let mut items: Vec<&Notification> = self.notifications.iter().collect();
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        items.truncate(RECENT_NOTIFICATIONS_LIMIT);
        items
    }

    fn persist(&self) {
        if let Err(err) = self
            .repo
            .save_json(storage_keys::NOTIFICATIONS, &self.notifications)
        {
            warn!("event=storage_save module=notification status=error error={err}");
        }
    }
}
