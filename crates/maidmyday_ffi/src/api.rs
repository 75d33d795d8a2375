//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, screen-level functions to Dart via FRB.
//! - Restore stores from local storage per call and persist their effects.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Store sessions are serialized process-wide; there is one writer at a time.
//! - Return values are plain envelopes with `ok` and a UTF-8 `message`.

use log::warn;
use maidmyday_core::db::open_db;
use maidmyday_core::model::now_epoch_ms;
use maidmyday_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppStores, Conversation, Message, SqliteKvRepository, StoreConfig, Task,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const STORAGE_DB_FILE_NAME: &str = "maidmyday.sqlite3";
static STORAGE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the database file used by every later call.
///
/// Without this call the path comes from `MAIDMYDAY_DB_PATH` or falls back
/// to the system temp directory.
///
/// # FFI contract
/// - First successful call wins; repeating it with the same path is a no-op.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_storage(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path must not be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    if !requested.is_absolute() {
        return format!("db_path must be absolute: {}", requested.display());
    }

    let active = STORAGE_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "storage already configured at `{}`; restart the app to change it",
            active.display()
        )
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Optional id of the affected entity.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Conversation row on the chat screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationItem {
    pub conversation_id: String,
    /// The other participant; equals the caller for a self-conversation.
    pub partner_id: String,
    pub last_message_preview: Option<String>,
    pub last_message_at_ms: Option<i64>,
    pub unread_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationListResponse {
    pub ok: bool,
    pub items: Vec<ConversationItem>,
    pub message: String,
}

/// One chat bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageItem {
    pub message_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub timestamp_ms: i64,
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageListResponse {
    pub ok: bool,
    pub items: Vec<MessageItem>,
    pub message: String,
}

/// Task card shared by task list and dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub task_id: String,
    pub title: String,
    /// Priority label (`low|medium|high`).
    pub priority: String,
    pub deadline_ms: i64,
    pub assigned_to: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    pub message: String,
}

/// Home screen envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardResponse {
    pub ok: bool,
    pub message: String,
    pub greeting_name: Option<String>,
    pub upcoming_tasks: Vec<TaskItem>,
    pub pending_task_count: u32,
    pub current_schedule_title: Option<String>,
    /// Completed share of the current schedule's tasks, `0..=100`.
    pub current_schedule_progress: Option<u32>,
    pub unread_notification_count: u32,
    pub unread_message_count: u32,
}

impl DashboardResponse {
    fn failure(message: String) -> Self {
        Self {
            ok: false,
            message,
            greeting_name: None,
            upcoming_tasks: Vec::new(),
            pending_task_count: 0,
            current_schedule_title: None,
            current_schedule_progress: None,
            unread_notification_count: 0,
            unread_message_count: 0,
        }
    }
}

/// Signs in a seeded user with the mock password.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the signed-in user id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_login(email: String, password: String) -> ActionResponse {
    let result = with_stores(|stores| {
        stores
            .auth
            .login(email.trim(), &password)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(user) => ActionResponse::success(format!("Welcome, {}.", user.name), Some(user.id)),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Sends a chat message and reconciles its conversation.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the conversation id holding the new message on success.
#[flutter_rust_bridge::frb(sync)]
pub fn chat_send_message(sender_id: String, receiver_id: String, content: String) -> ActionResponse {
    let result = with_stores(|stores| {
        let message = stores
            .chat
            .send_message(&sender_id, &receiver_id, &content)
            .map_err(|err| format!("chat_send_message failed: {err}"))?;
        Ok(stores
            .chat
            .find_conversation(&message.sender_id, &message.receiver_id)
            .map(|conversation| conversation.id.clone()))
    });
    match result {
        Ok(conversation_id) => ActionResponse::success("Message sent.", conversation_id),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Marks every message of one conversation read.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; idempotent.
#[flutter_rust_bridge::frb(sync)]
pub fn chat_mark_conversation_read(conversation_id: String) -> ActionResponse {
    let result = with_stores(|stores| {
        stores
            .chat
            .mark_conversation_as_read(&conversation_id)
            .map_err(|err| format!("chat_mark_conversation_read failed: {err}"))
    });
    match result {
        Ok(flipped) => ActionResponse::success(
            format!("Marked {flipped} message(s) read."),
            Some(conversation_id.trim().to_string()),
        ),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Lists a user's conversations, most recent activity first.
#[flutter_rust_bridge::frb(sync)]
pub fn chat_list_conversations(user_id: String) -> ConversationListResponse {
    let user_id = user_id.trim().to_string();
    let result = with_stores(|stores| {
        Ok(stores
            .chat
            .conversations_for_user(&user_id)
            .into_iter()
            .map(|conversation| to_conversation_item(conversation, &user_id))
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => ConversationListResponse {
            ok: true,
            message: format!("Found {} conversation(s).", items.len()),
            items,
        },
        Err(err) => ConversationListResponse {
            ok: false,
            items: Vec::new(),
            message: err,
        },
    }
}

/// Lists the messages of one conversation in send order.
#[flutter_rust_bridge::frb(sync)]
pub fn chat_list_messages(conversation_id: String) -> MessageListResponse {
    let result = with_stores(|stores| {
        stores
            .chat
            .fetch_messages(&conversation_id)
            .map(|messages| messages.iter().map(to_message_item).collect::<Vec<_>>())
            .map_err(|err| format!("chat_list_messages failed: {err}"))
    });
    match result {
        Ok(items) => MessageListResponse {
            ok: true,
            message: format!("Found {} message(s).", items.len()),
            items,
        },
        Err(err) => MessageListResponse {
            ok: false,
            items: Vec::new(),
            message: err,
        },
    }
}

/// Lists open tasks by deadline.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_pending() -> TaskListResponse {
    let result = with_stores(|stores| {
        Ok(stores
            .tasks
            .pending_tasks()
            .into_iter()
            .map(to_task_item)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => TaskListResponse {
            ok: true,
            message: format!("Found {} pending task(s).", items.len()),
            items,
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: err,
        },
    }
}

/// Flips a task's completed flag.
///
/// # FFI contract
/// - Unknown ids leave storage untouched and return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle_completion(task_id: String) -> ActionResponse {
    let task_id = task_id.trim().to_string();
    let result = with_stores(|stores| Ok(stores.tasks.toggle_task_completion(&task_id)));
    match result {
        Ok(Some(task)) => {
            let message = if task.completed {
                "Task completed."
            } else {
                "Task reopened."
            };
            ActionResponse::success(message, Some(task.id))
        }
        Ok(None) => ActionResponse::failure(format!("task not found: {task_id}")),
        Err(err) => ActionResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> ActionResponse {
    let task_id = task_id.trim().to_string();
    match with_stores(|stores| Ok(stores.tasks.delete_task(&task_id))) {
        Ok(true) => ActionResponse::success("Task deleted.", Some(task_id)),
        Ok(false) => ActionResponse::failure(format!("task not found: {task_id}")),
        Err(err) => ActionResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn notification_mark_all_read() -> ActionResponse {
    match with_stores(|stores| {
        stores.notifications.mark_all_as_read();
        Ok(())
    }) {
        Ok(()) => ActionResponse::success("All notifications marked read.", None),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Collects the home screen projection for the signed-in session.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; counts are zero when nobody is signed in.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_summary() -> DashboardResponse {
    let result = with_stores(|stores| Ok(stores.dashboard(now_epoch_ms())));
    match result {
        Ok(summary) => DashboardResponse {
            ok: true,
            message: "Dashboard ready.".to_string(),
            greeting_name: summary.greeting_name,
            upcoming_tasks: summary.upcoming_tasks.iter().map(to_task_item).collect(),
            pending_task_count: saturating_u32(summary.pending_task_count),
            current_schedule_progress: summary
                .current_schedule
                .as_ref()
                .map(|schedule| u32::from(schedule.progress_percent())),
            current_schedule_title: summary.current_schedule.map(|schedule| schedule.title),
            unread_notification_count: saturating_u32(summary.unread_notification_count),
            unread_message_count: summary.unread_message_count,
        },
        Err(err) => DashboardResponse::failure(err),
    }
}

fn resolve_storage_db_path() -> PathBuf {
    STORAGE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("MAIDMYDAY_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORAGE_DB_FILE_NAME)
        })
        .clone()
}

fn with_stores<T>(
    f: impl FnOnce(&mut AppStores<SqliteKvRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    // Snapshots are written whole, so a poisoned lock is still usable.
    let _guard = SESSION_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let db_path = resolve_storage_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=ffi_storage_open module=ffi status=error error={err}");
        format!("storage open failed: {err}")
    })?;
    let repo = SqliteKvRepository::try_new(&conn).map_err(|err| {
        warn!("event=ffi_storage_open module=ffi status=error error={err}");
        format!("storage repo init failed: {err}")
    })?;
    let mut stores = AppStores::open(repo, StoreConfig::default());
    f(&mut stores)
}

fn to_conversation_item(conversation: &Conversation, user_id: &str) -> ConversationItem {
    ConversationItem {
        conversation_id: conversation.id.clone(),
        partner_id: conversation
            .partner_of(user_id)
            .cloned()
            .unwrap_or_else(|| user_id.to_string()),
        last_message_preview: conversation
            .last_message
            .as_ref()
            .map(|message| message.content.clone()),
        last_message_at_ms: conversation.last_activity(),
        unread_count: conversation.unread_count,
    }
}

fn to_message_item(message: &Message) -> MessageItem {
    MessageItem {
        message_id: message.id.clone(),
        sender_id: message.sender_id.clone(),
        receiver_id: message.receiver_id.clone(),
        content: message.content.clone(),
        timestamp_ms: message.timestamp,
        read: message.read,
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        task_id: task.id.clone(),
        title: task.title.clone(),
        priority: task.priority.as_str().to_string(),
        deadline_ms: task.deadline,
        assigned_to: task.assigned_to.clone(),
        completed: task.completed,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        chat_list_conversations, chat_list_messages, chat_mark_conversation_read,
        chat_send_message, configure_storage, core_version, dashboard_summary, init_logging,
        ping, task_delete, task_list_pending, task_toggle_completion,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_storage_rejects_relative_path() {
        assert!(!configure_storage("data/maidmyday.sqlite3".to_string()).is_empty());
        assert!(!configure_storage("   ".to_string()).is_empty());
    }

    #[test]
    fn send_then_list_and_mark_read() {
        let sender = unique_token("ffi-sender");
        let receiver = unique_token("ffi-receiver");

        let sent = chat_send_message(sender.clone(), receiver.clone(), " hi ".to_string());
        assert!(sent.ok, "{}", sent.message);
        let conversation_id = sent.id.expect("send should return conversation id");

        let listed = chat_list_conversations(receiver.clone());
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].partner_id, sender);
        assert_eq!(listed.items[0].unread_count, 1);
        assert_eq!(listed.items[0].last_message_preview.as_deref(), Some("hi"));

        let messages = chat_list_messages(conversation_id.clone());
        assert!(messages.ok, "{}", messages.message);
        assert_eq!(messages.items.len(), 1);
        assert!(!messages.items[0].read);

        let marked = chat_mark_conversation_read(conversation_id.clone());
        assert!(marked.ok, "{}", marked.message);
        let again = chat_mark_conversation_read(conversation_id);
        assert!(again.ok, "{}", again.message);
        assert_eq!(again.message, "Marked 0 message(s) read.");

        assert_eq!(chat_list_conversations(receiver).items[0].unread_count, 0);
    }

    #[test]
    fn send_rejects_blank_content() {
        let response = chat_send_message("user1".to_string(), "user2".to_string(), "  ".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("chat_send_message failed"));
    }

    #[test]
    fn unknown_conversation_is_reported() {
        let response = chat_list_messages(unique_token("conv-missing"));
        assert!(!response.ok);
        assert!(response.items.is_empty());
    }

    #[test]
    fn unknown_task_operations_fail_without_panicking() {
        let missing = unique_token("task-missing");
        assert!(!task_toggle_completion(missing.clone()).ok);
        assert!(!task_delete(missing).ok);
    }

    #[test]
    fn pending_tasks_are_open_and_sorted() {
        let response = task_list_pending();
        assert!(response.ok, "{}", response.message);
        assert!(response.items.iter().all(|task| !task.completed));
        assert!(response
            .items
            .windows(2)
            .all(|pair| pair[0].deadline_ms <= pair[1].deadline_ms));
    }

    #[test]
    fn dashboard_caps_upcoming_tasks() {
        let response = dashboard_summary();
        assert!(response.ok, "{}", response.message);
        assert!(response.upcoming_tasks.len() <= 3);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
