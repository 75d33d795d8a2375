//! Home screen projection.

use crate::model::notification::Notification;
use crate::model::schedule::Schedule;
use crate::model::task::Task;
use crate::repo::kv_repo::KvRepository;
use crate::service::app_stores::AppStores;

/// Pending tasks shown on the home screen.
pub const DASHBOARD_TASK_LIMIT: usize = 3;
/// Unread notifications shown on the home screen.
pub const DASHBOARD_NOTIFICATION_LIMIT: usize = 3;

/// Snapshot of what the home screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Signed-in user's name, if any.
    pub greeting_name: Option<String>,
    /// Earliest-deadline open tasks.
    pub upcoming_tasks: Vec<Task>,
    pub pending_task_count: usize,
    pub current_schedule: Option<Schedule>,
    pub unread_notifications: Vec<Notification>,
    pub unread_notification_count: usize,
    /// Unread chat messages across the signed-in user's conversations.
    pub unread_message_count: u32,
}

impl DashboardSummary {
    pub fn collect<R: KvRepository>(stores: &AppStores<R>, now: i64) -> Self {
        let pending = stores.tasks.pending_tasks();
        let user = stores.auth.current_user();

        Self {
            greeting_name: user.map(|user| user.name.clone()),
            upcoming_tasks: pending
                .iter()
                .take(DASHBOARD_TASK_LIMIT)
                .map(|task| (*task).clone())
                .collect(),
            pending_task_count: pending.len(),
            current_schedule: stores.schedules.current_schedule(now).cloned(),
            unread_notifications: stores
                .notifications
                .unread_notifications(DASHBOARD_NOTIFICATION_LIMIT)
                .into_iter()
                .cloned()
                .collect(),
            unread_notification_count: stores.notifications.unread_count(),
            unread_message_count: user
                .map(|user| stores.chat.unread_total_for(&user.id))
                .unwrap_or(0),
        }
    }
}
