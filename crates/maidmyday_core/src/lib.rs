//! Core domain logic for MaidMyDay.
//! This crate is the single source of truth for household store invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::chat::{Conversation, ConversationId, Message, MessageId};
pub use model::notification::{NewNotification, Notification, NotificationKind};
pub use model::schedule::{NewSchedule, Schedule, SchedulePatch, SchedulePhase};
pub use model::task::{NewTask, Task, TaskId, TaskPatch, TaskPriority};
pub use model::user::{User, UserId, UserRole};
pub use repo::kv_repo::{storage_keys, KvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use service::app_stores::{AppStores, CreateTaskError};
pub use service::auth_service::{AuthError, AuthResult, AuthService};
pub use service::chat_service::{ChatError, ChatResult, ChatService};
pub use service::dashboard::DashboardSummary;
pub use service::notification_service::{NotificationError, NotificationService};
pub use service::schedule_service::{ScheduleError, ScheduleResult, ScheduleService};
pub use service::task_service::{TaskError, TaskResult, TaskService};
pub use service::StoreConfig;
pub use validation::{CreateTaskForm, FieldError, FormErrors, RegistrationForm};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
