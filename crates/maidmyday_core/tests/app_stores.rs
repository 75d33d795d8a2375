use maidmyday_core::db::open_db_in_memory;
use maidmyday_core::model::now_epoch_ms;
use maidmyday_core::{AppStores, CreateTaskError, CreateTaskForm, SqliteKvRepository, StoreConfig, TaskPriority};

#[test]
fn dashboard_summarizes_signed_in_session() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut stores = AppStores::open(repo, StoreConfig::default());
    stores.auth.login("john@example.com", "password").unwrap();

    let summary = stores.dashboard(now_epoch_ms());

    assert_eq!(summary.greeting_name.as_deref(), Some("John Smith"));
    assert_eq!(summary.upcoming_tasks.len(), 3);
    assert_eq!(summary.pending_task_count, 4);
    assert_eq!(
        summary.current_schedule.map(|schedule| schedule.id),
        Some("schedule1".to_string())
    );
    assert_eq!(summary.unread_notification_count, 1);
    assert_eq!(summary.unread_notifications.len(), 1);
    assert_eq!(summary.unread_message_count, 2);
}

#[test]
fn dashboard_without_session_has_no_chat_counts() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let stores = AppStores::open(repo, StoreConfig::default());

    let summary = stores.dashboard(now_epoch_ms());
    assert!(summary.greeting_name.is_none());
    assert_eq!(summary.unread_message_count, 0);
}

#[test]
fn create_task_form_adds_task_for_staff_member() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut stores = AppStores::open(repo, StoreConfig::default());

    let form = CreateTaskForm {
        title: "Iron shirts".to_string(),
        description: "Five white shirts".to_string(),
        priority: TaskPriority::High,
        deadline: "2031-01-15T09:00:00Z".to_string(),
        assigned_to: "Robert Chen".to_string(),
    };
    let task = stores.create_task_from_form(&form).unwrap();
    assert_eq!(task.assigned_to_id, "user4");
    assert_eq!(stores.tasks.tasks().len(), 7);

    let bad = CreateTaskForm {
        assigned_to: "Nobody".to_string(),
        ..form
    };
    assert!(matches!(
        stores.create_task_from_form(&bad),
        Err(CreateTaskError::Form(_))
    ));
    assert_eq!(stores.tasks.tasks().len(), 7);
}
