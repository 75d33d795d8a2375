use maidmyday_core::db::open_db_in_memory;
use maidmyday_core::{
    storage_keys, KvRepository, NewTask, SqliteKvRepository, StoreConfig, Task, TaskError,
    TaskPatch, TaskPriority, TaskService,
};
use rusqlite::Connection;

fn tasks(conn: &Connection) -> TaskService<SqliteKvRepository<'_>> {
    let repo = SqliteKvRepository::try_new(conn).unwrap();
    TaskService::new(repo, StoreConfig::default())
}

fn draft(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: "Front and back windows".to_string(),
        priority: TaskPriority::Medium,
        deadline: 5_000,
        assigned_to: "Robert Chen".to_string(),
        assigned_to_id: "user4".to_string(),
        completed: false,
    }
}

#[test]
fn add_task_assigns_identity_and_appends() {
    let conn = open_db_in_memory().unwrap();
    let mut store = tasks(&conn);

    let created = store.add_task(draft("  Wash windows ")).unwrap();

    assert!(created.id.starts_with("task-"));
    assert_eq!(created.title, "Wash windows");
    assert!(created.created_at > 0);
    assert_eq!(store.tasks().last(), Some(&created));
}

#[test]
fn add_task_rejects_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let mut store = tasks(&conn);

    assert_eq!(store.add_task(draft(" ")).unwrap_err(), TaskError::EmptyTitle);
    assert_eq!(store.last_error(), Some("Failed to add task"));
    assert_eq!(store.tasks().len(), 6);
}

#[test]
fn delete_removes_only_the_target_task() {
    let conn = open_db_in_memory().unwrap();
    let mut store = tasks(&conn);
    let others: Vec<Task> = store
        .tasks()
        .iter()
        .filter(|task| task.id != "task3")
        .cloned()
        .collect();

    assert!(store.delete_task("task3"));

    assert!(store.task("task3").is_none());
    assert_eq!(store.tasks(), others.as_slice());
    assert!(!store.delete_task("task3"));
}

#[test]
fn toggle_flips_completion_and_unknown_id_is_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut store = tasks(&conn);

    let toggled = store.toggle_task_completion("task1").unwrap();
    assert!(toggled.completed);

    let before = store.tasks().to_vec();
    assert!(store.toggle_task_completion("task404").is_none());
    assert_eq!(store.tasks(), before.as_slice());
}

#[test]
fn update_merges_fields_shallowly() {
    let conn = open_db_in_memory().unwrap();
    let mut store = tasks(&conn);
    let patch = TaskPatch {
        priority: Some(TaskPriority::Low),
        deadline: Some(42),
        ..TaskPatch::default()
    };

    let updated = store.update_task("task2", &patch).unwrap();

    assert_eq!(updated.priority, TaskPriority::Low);
    assert_eq!(updated.deadline, 42);
    assert_eq!(updated.title, "Clean Kitchen");
    assert!(store.update_task("nope", &patch).is_none());
}

#[test]
fn empty_patch_returns_task_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut store = TaskService::new(repo, StoreConfig::default());
    let before = store.task("task1").cloned().unwrap();

    let unchanged = store.update_task("task1", &TaskPatch::default()).unwrap();

    assert_eq!(unchanged, before);
    assert!(repo.get_item(storage_keys::TASKS).unwrap().is_none());
}

#[test]
fn pending_and_completed_projections_are_sorted() {
    let conn = open_db_in_memory().unwrap();
    let store = tasks(&conn);

    let pending: Vec<&str> = store
        .pending_tasks()
        .into_iter()
        .map(|task| task.id.as_str())
        .collect();
    assert_eq!(pending.len(), 4);
    let deadlines: Vec<i64> = store.pending_tasks().iter().map(|t| t.deadline).collect();
    assert!(deadlines.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(pending.last(), Some(&"task3"));

    let completed: Vec<&str> = store
        .completed_tasks()
        .into_iter()
        .map(|task| task.id.as_str())
        .collect();
    assert_eq!(completed, vec!["task2", "task5"]);
}

#[test]
fn tasks_for_assignee_filters_by_id() {
    let conn = open_db_in_memory().unwrap();
    let store = tasks(&conn);

    let ids: Vec<&str> = store
        .tasks_for_assignee("user2")
        .into_iter()
        .map(|task| task.id.as_str())
        .collect();
    assert_eq!(ids, vec!["task1", "task4"]);
}

#[test]
fn mutations_are_persisted_and_restored() {
    let conn = open_db_in_memory().unwrap();
    {
        let mut store = tasks(&conn);
        store.delete_task("task6");
        store.toggle_task_completion("task3");
    }

    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let stored: Vec<Task> = repo.load_json(storage_keys::TASKS).unwrap().unwrap();
    assert_eq!(stored.len(), 5);

    let restored = tasks(&conn);
    assert!(restored.task("task6").is_none());
    assert!(restored.task("task3").unwrap().completed);
}

#[test]
fn fetch_resets_to_seed() {
    let conn = open_db_in_memory().unwrap();
    let mut store = tasks(&conn);
    store.delete_task("task1");

    store.fetch_tasks();

    assert_eq!(store.tasks().len(), 6);
    assert!(store.task("task1").is_some());
}
