//! Schedule domain model.
//!
//! # Responsibility
//! - Define weekly plans that group task copies over a time window.
//! - Classify a schedule relative to an instant (current/upcoming/past).
//!
//! # Invariants
//! - `tasks` holds embedded copies; editing a task elsewhere does not
//!   propagate into schedules that already contain it.
//! - `end_date` should not be earlier than `start_date`.

use crate::model::task::{Task, TaskId};
use serde::{Deserialize, Serialize};

/// Stable identifier for schedules.
pub type ScheduleId = String;

/// Position of a schedule window relative to an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulePhase {
    /// `start_date > now`.
    Upcoming,
    /// `start_date <= now <= end_date`.
    Current,
    /// `end_date < now`.
    Past,
}

/// Plan of household tasks for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: ScheduleId,
    pub title: String,
    #[serde(with = "crate::model::timestamp")]
    pub start_date: i64,
    #[serde(with = "crate::model::timestamp")]
    pub end_date: i64,
    pub tasks: Vec<Task>,
    #[serde(with = "crate::model::timestamp")]
    pub created_at: i64,
}

impl Schedule {
    pub fn phase_at(&self, now: i64) -> SchedulePhase {
        if self.start_date > now {
            SchedulePhase::Upcoming
        } else if self.end_date < now {
            SchedulePhase::Past
        } else {
            SchedulePhase::Current
        }
    }

    pub fn contains_task(&self, task_id: &str) -> bool {
        self.tasks.iter().any(|task| task.id == task_id)
    }

    /// Completion ratio of embedded tasks in percent; `0` for empty plans.
    pub fn progress_percent(&self) -> u8 {
        if self.tasks.is_empty() {
            return 0;
        }
        let done = self.tasks.iter().filter(|task| task.completed).count();
        ((done * 100) / self.tasks.len()) as u8
    }

    pub fn completed_task_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }
}

/// Caller-provided fields for a new schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSchedule {
    pub title: String,
    pub start_date: i64,
    pub end_date: i64,
    pub tasks: Vec<Task>,
}

impl NewSchedule {
    pub fn into_schedule(self, id: ScheduleId, created_at: i64) -> Schedule {
        Schedule {
            id,
            title: self.title,
            start_date: self.start_date,
            end_date: self.end_date,
            tasks: self.tasks,
            created_at,
        }
    }
}

/// Partial update for an existing schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulePatch {
    pub title: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    /// Replaces the whole embedded task list when set.
    pub tasks: Option<Vec<Task>>,
}

impl SchedulePatch {
    pub fn apply(&self, schedule: &mut Schedule) {
        if let Some(title) = &self.title {
            schedule.title = title.clone();
        }
        if let Some(start_date) = self.start_date {
            schedule.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            schedule.end_date = end_date;
        }
        if let Some(tasks) = &self.tasks {
            schedule.tasks = tasks.clone();
        }
    }
}

/// Removes an embedded task copy; returns whether anything was removed.
pub(crate) fn remove_embedded_task(schedule: &mut Schedule, task_id: &TaskId) -> bool {
    let before = schedule.tasks.len();
    schedule.tasks.retain(|task| &task.id != task_id);
    schedule.tasks.len() != before
}

#[cfg(test)]
mod tests {
    use super::{Schedule, SchedulePhase};

    fn window(start: i64, end: i64) -> Schedule {
        Schedule {
            id: "schedule9".to_string(),
            title: "Week".to_string(),
            start_date: start,
            end_date: end,
            tasks: Vec::new(),
            created_at: 0,
        }
    }

    #[test]
    fn phase_boundaries_are_inclusive_for_current() {
        let schedule = window(100, 200);
        assert_eq!(schedule.phase_at(99), SchedulePhase::Upcoming);
        assert_eq!(schedule.phase_at(100), SchedulePhase::Current);
        assert_eq!(schedule.phase_at(200), SchedulePhase::Current);
        assert_eq!(schedule.phase_at(201), SchedulePhase::Past);
    }

    #[test]
    fn empty_schedule_progress_is_zero() {
        assert_eq!(window(0, 1).progress_percent(), 0);
    }
}
