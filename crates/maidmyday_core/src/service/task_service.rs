//! Task store.
//!
//! # Responsibility
//! - Provide fetch/add/update/delete/toggle over the household task list.
//! - Provide the pending/completed projections used by the task tabs.
//!
//! # Invariants
//! - Unknown ids make update/delete/toggle a no-op, never an error.
//! - Pending tasks sort by deadline ascending; completed by creation
//!   time descending.

use crate::model::task::{NewTask, Task, TaskPatch};
use crate::model::{generate_id, now_epoch_ms};
use crate::repo::kv_repo::{storage_keys, KvRepository};
use crate::seed;
use crate::service::StoreConfig;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskResult<T> = Result<T, TaskError>;

/// Errors returned by task store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Title is blank after trim.
    EmptyTitle,
    /// Assignee id or name is blank after trim.
    MissingAssignee,
}

impl Display for TaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be blank"),
            Self::MissingAssignee => write!(f, "task must be assigned to a staff member"),
        }
    }
}

impl Error for TaskError {}

/// Task store over a key/value repository.
pub struct TaskService<R: KvRepository> {
    repo: R,
    config: StoreConfig,
    tasks: Vec<Task>,
    last_error: Option<String>,
}

impl<R: KvRepository> TaskService<R> {
    pub fn new(repo: R, config: StoreConfig) -> Self {
        let tasks = match repo.load_json::<Vec<Task>>(storage_keys::TASKS) {
            Ok(Some(stored)) => stored,
            Ok(None) => seed::tasks(now_epoch_ms()),
            Err(err) => {
                warn!("event=storage_restore module=task status=error error={err}");
                seed::tasks(now_epoch_ms())
            }
        };
        Self {
            repo,
            config,
            tasks,
            last_error: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Resets the list to the seed snapshot.
    pub fn fetch_tasks(&mut self) {
        self.last_error = None;
        self.config.simulate_latency();
        self.tasks = seed::tasks(now_epoch_ms());
        self.persist();
    }

    /// Appends a task with a generated id and creation timestamp.
    pub fn add_task(&mut self, draft: NewTask) -> TaskResult<Task> {
        self.last_error = None;
        if let Err(err) = validate_draft(&draft) {
            self.last_error = Some("Failed to add task".to_string());
            return Err(err);
        }

        self.config.simulate_latency();
        let mut draft = draft;
        draft.title = draft.title.trim().to_string();
        draft.description = draft.description.trim().to_string();
        let task = draft.into_task(generate_id("task"), now_epoch_ms());
        self.tasks.push(task.clone());
        self.persist();

        info!(
            "event=task_add module=task status=ok task_id={} priority={}",
            task.id,
            task.priority.as_str()
        );
        Ok(task)
    }

    /// Shallow-merges `patch` into the task with `task_id`.
    ///
    /// Returns the updated task, or `None` when no task has that id. An
    /// empty patch returns the task as is and skips the storage write.
    pub fn update_task(&mut self, task_id: &str, patch: &TaskPatch) -> Option<Task> {
        self.last_error = None;
        self.config.simulate_latency();
        let task = self.tasks.iter_mut().find(|task| task.id == task_id)?;
        if patch.is_empty() {
            return Some(task.clone());
        }
        patch.apply(task);
        let updated = task.clone();
        self.persist();
        info!("event=task_update module=task status=ok task_id={task_id}");
        Some(updated)
    }

    /// Removes the task with `task_id`; returns whether it existed.
    pub fn delete_task(&mut self, task_id: &str) -> bool {
        self.last_error = None;
        self.config.simulate_latency();
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != task_id);
        let removed = self.tasks.len() != before;
        if removed {
            self.persist();
            info!("event=task_delete module=task status=ok task_id={task_id}");
        }
        removed
    }

    /// Flips completion of an existing task; unknown ids are a no-op.
    pub fn toggle_task_completion(&mut self, task_id: &str) -> Option<Task> {
        let completed = self.task(task_id)?.completed;
        self.update_task(task_id, &TaskPatch::completed(!completed))
    }

    /// Open tasks, earliest deadline first.
    pub fn pending_tasks(&self) -> Vec<&Task> {
        let mut items: Vec<&Task> = self.tasks.iter().filter(|task| !task.completed).collect();
        items.sort_by_key(|task| task.deadline);
        items
    }

    /// Done tasks, most recently created first.
    pub fn completed_tasks(&self) -> Vec<&Task> {
        let mut items: Vec<&Task> = self.tasks.iter().filter(|task| task.completed).collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    pub fn tasks_for_assignee(&self, assignee_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.assigned_to_id == assignee_id)
            .collect()
    }

    fn persist(&self) {
        if let Err(err) = self.repo.save_json(storage_keys::TASKS, &self.tasks) {
            warn!("event=storage_save module=task status=error error={err}");
        }
    }
}

fn validate_draft(draft: &NewTask) -> TaskResult<()> {
    if draft.title.trim().is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    if draft.assigned_to_id.trim().is_empty() || draft.assigned_to.trim().is_empty() {
        return Err(TaskError::MissingAssignee);
    }
    Ok(())
}
