use maidmyday_core::db::open_db_in_memory;
use maidmyday_core::{
    NewNotification, NotificationError, NotificationKind, NotificationService,
    SqliteKvRepository, StoreConfig,
};
use rusqlite::Connection;

fn notifications(conn: &Connection) -> NotificationService<SqliteKvRepository<'_>> {
    let repo = SqliteKvRepository::try_new(conn).unwrap();
    NotificationService::new(repo, StoreConfig::default())
}

#[test]
fn mark_as_read_updates_unread_count() {
    let conn = open_db_in_memory().unwrap();
    let mut store = notifications(&conn);
    assert_eq!(store.unread_count(), 1);

    assert!(store.mark_as_read("notif1"));
    assert_eq!(store.unread_count(), 0);
    assert!(!store.mark_as_read("notif404"));
}

#[test]
fn add_then_mark_all_read() {
    let conn = open_db_in_memory().unwrap();
    let mut store = notifications(&conn);

    let created = store
        .add_notification(NewNotification {
            title: "New Message".to_string(),
            message: "Robert sent you a message.".to_string(),
            kind: NotificationKind::Message,
            related_id: Some("conv3".to_string()),
        })
        .unwrap();
    assert!(!created.read);
    assert_eq!(store.unread_count(), 2);
    assert_eq!(store.recent_notifications()[0].id, created.id);

    store.mark_all_as_read();
    assert_eq!(store.unread_count(), 0);
}

#[test]
fn blank_title_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut store = notifications(&conn);

    let err = store
        .add_notification(NewNotification {
            title: "  ".to_string(),
            message: String::new(),
            kind: NotificationKind::System,
            related_id: None,
        })
        .unwrap_err();
    assert_eq!(err, NotificationError::EmptyTitle);
    assert_eq!(store.notifications().len(), 5);
}

#[test]
fn clear_one_and_clear_all() {
    let conn = open_db_in_memory().unwrap();
    let mut store = notifications(&conn);

    assert!(store.clear_notification("notif5"));
    assert!(!store.clear_notification("notif5"));
    assert_eq!(store.notifications().len(), 4);

    store.clear_all_notifications();
    assert!(store.notifications().is_empty());

    let restored = notifications(&conn);
    assert!(restored.notifications().is_empty());
}

#[test]
fn recent_notifications_are_newest_first_and_capped() {
    let conn = open_db_in_memory().unwrap();
    let store = notifications(&conn);

    let ids: Vec<&str> = store
        .recent_notifications()
        .into_iter()
        .map(|notification| notification.id.as_str())
        .collect();
    assert_eq!(ids, vec!["notif1", "notif2", "notif3", "notif4", "notif5"]);
}
