//! Task domain model.
//!
//! # Responsibility
//! - Define the assignable household task record.
//! - Provide shallow patch semantics used by task and schedule stores.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store, never by callers.
//! - A patch only touches the fields it carries.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// Stable identifier for tasks.
pub type TaskId = String;

/// Urgency level shown on task cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Parses UI priority labels case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Household task assigned to one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    /// Due time in epoch milliseconds.
    #[serde(with = "crate::model::timestamp")]
    pub deadline: i64,
    /// Display name of the assignee.
    pub assigned_to: String,
    pub assigned_to_id: UserId,
    pub completed: bool,
    /// Creation time in epoch milliseconds.
    #[serde(with = "crate::model::timestamp")]
    pub created_at: i64,
}

/// Caller-provided fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub deadline: i64,
    pub assigned_to: String,
    pub assigned_to_id: UserId,
    pub completed: bool,
}

impl NewTask {
    /// Materializes the draft with store-assigned identity.
    pub fn into_task(self, id: TaskId, created_at: i64) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            deadline: self.deadline,
            assigned_to: self.assigned_to,
            assigned_to_id: self.assigned_to_id,
            completed: self.completed,
            created_at,
        }
    }
}

/// Partial update for an existing task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub deadline: Option<i64>,
    pub assigned_to: Option<String>,
    pub assigned_to_id: Option<UserId>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Patch that only flips completion state.
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies carried fields onto `task`, leaving identity untouched.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
        if let Some(assigned_to) = &self.assigned_to {
            task.assigned_to = assigned_to.clone();
        }
        if let Some(assigned_to_id) = &self.assigned_to_id {
            task.assigned_to_id = assigned_to_id.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NewTask, TaskPatch, TaskPriority};

    fn draft() -> NewTask {
        NewTask {
            title: "Vacuum".to_string(),
            description: "Living room".to_string(),
            priority: TaskPriority::High,
            deadline: 2_000,
            assigned_to: "Anna Johnson".to_string(),
            assigned_to_id: "user2".to_string(),
            completed: false,
        }
    }

    #[test]
    fn patch_only_touches_carried_fields() {
        let mut task = draft().into_task("task9".to_string(), 1_000);
        let patch = TaskPatch {
            title: Some("Vacuum hallway".to_string()),
            ..TaskPatch::default()
        };
        patch.apply(&mut task);

        assert_eq!(task.title, "Vacuum hallway");
        assert_eq!(task.description, "Living room");
        assert_eq!(task.id, "task9");
        assert_eq!(task.created_at, 1_000);
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!(TaskPriority::parse(" HIGH "), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse("urgent"), None);
    }

    #[test]
    fn serialized_task_uses_camel_case_keys() {
        let task = draft().into_task("task9".to_string(), 1_000);
        let json = serde_json::to_value(&task).expect("task should serialize");
        assert_eq!(json["assignedToId"], "user2");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["createdAt"], "1970-01-01T00:00:01.000Z");

        let restored: super::Task = serde_json::from_value(json).expect("task should parse");
        assert_eq!(restored, task);
    }
}
