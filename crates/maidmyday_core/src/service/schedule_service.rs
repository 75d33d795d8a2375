//! Schedule store.
//!
//! # Responsibility
//! - Provide fetch/add/update/delete over weekly plans.
//! - Add and remove embedded task copies.
//! - Classify plans as current, upcoming or past for the plans tabs.
//!
//! # Invariants
//! - Unknown schedule ids are a no-op for mutations.
//! - A schedule window never ends before it starts.

use crate::model::schedule::{
    remove_embedded_task, NewSchedule, Schedule, SchedulePatch, SchedulePhase,
};
use crate::model::task::{Task, TaskId};
use crate::model::{generate_id, now_epoch_ms};
use crate::repo::kv_repo::{storage_keys, KvRepository};
use crate::seed;
use crate::service::StoreConfig;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ScheduleResult<T> = Result<T, ScheduleError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    EmptyTitle,
    /// `end_date` lies before `start_date`.
    InvalidWindow { start_date: i64, end_date: i64 },
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "schedule title must not be blank"),
            Self::InvalidWindow {
                start_date,
                end_date,
            } => write!(
                f,
                "schedule ends at {end_date} before it starts at {start_date}"
            ),
        }
    }
}

impl Error for ScheduleError {}

/// Schedule store over a key/value repository.
pub struct ScheduleService<R: KvRepository> {
    repo: R,
    config: StoreConfig,
    schedules: Vec<Schedule>,
    last_error: Option<String>,
}

impl<R: KvRepository> ScheduleService<R> {
    pub fn new(repo: R, config: StoreConfig) -> Self {
        let schedules = match repo.load_json::<Vec<Schedule>>(storage_keys::SCHEDULES) {
            Ok(Some(stored)) => stored,
            Ok(None) => seed::schedules(now_epoch_ms()),
            Err(err) => {
                warn!("event=storage_restore module=schedule status=error error={err}");
                seed::schedules(now_epoch_ms())
            }
        };
        Self {
            repo,
            config,
            schedules,
            last_error: None,
        }
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn schedule(&self, schedule_id: &str) -> Option<&Schedule> {
        self.schedules
            .iter()
            .find(|schedule| schedule.id == schedule_id)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn fetch_schedules(&mut self) {
        self.last_error = None;
        self.config.simulate_latency();
        self.schedules = seed::schedules(now_epoch_ms());
        self.persist();
    }

    pub fn add_schedule(&mut self, draft: NewSchedule) -> ScheduleResult<Schedule> {
        self.last_error = None;
        let validated = if draft.title.trim().is_empty() {
            Err(ScheduleError::EmptyTitle)
        } else {
            check_window(draft.start_date, draft.end_date)
        };
        if let Err(err) = validated {
            self.last_error = Some("Failed to add schedule".to_string());
            return Err(err);
        }

        self.config.simulate_latency();
        let mut draft = draft;
        draft.title = draft.title.trim().to_string();
        let schedule = draft.into_schedule(generate_id("schedule"), now_epoch_ms());
        self.schedules.push(schedule.clone());
        self.persist();
        info!(
            "event=schedule_add module=schedule status=ok schedule_id={} tasks={}",
            schedule.id,
            schedule.tasks.len()
        );
        Ok(schedule)
    }

    /// Applies `patch`; returns `Ok(None)` for unknown ids.
    ///
    /// # Errors
    /// - `InvalidWindow` when the patched window would end before it starts;
    ///   the stored schedule is left unchanged.
    pub fn update_schedule(
        &mut self,
        schedule_id: &str,
        patch: &SchedulePatch,
    ) -> ScheduleResult<Option<Schedule>> {
        self.last_error = None;
        self.config.simulate_latency();
        let Some(schedule) = self
            .schedules
            .iter_mut()
            .find(|schedule| schedule.id == schedule_id)
        else {
            return Ok(None);
        };

        let mut candidate = schedule.clone();
        patch.apply(&mut candidate);
        if let Err(err) = check_window(candidate.start_date, candidate.end_date) {
            self.last_error = Some("Failed to update schedule".to_string());
            return Err(err);
        }
        *schedule = candidate.clone();
        self.persist();
        Ok(Some(candidate))
    }

    pub fn delete_schedule(&mut self, schedule_id: &str) -> bool {
        self.last_error = None;
        self.config.simulate_latency();
        let before = self.schedules.len();
        self.schedules.retain(|schedule| schedule.id != schedule_id);
        let removed = self.schedules.len() != before;
        if removed {
            self.persist();
            info!("event=schedule_delete module=schedule status=ok schedule_id={schedule_id}");
        }
        removed
    }

    /// Appends a copy of `task`; returns whether the schedule exists.
    pub fn add_task_to_schedule(&mut self, schedule_id: &str, task: &Task) -> bool {
        self.last_error = None;
        self.config.simulate_latency();
        let Some(schedule) = self
            .schedules
            .iter_mut()
            .find(|schedule| schedule.id == schedule_id)
        else {
            return false;
        };
        schedule.tasks.push(task.clone());
        self.persist();
        true
    }

    /// Drops embedded copies of `task_id`; returns whether any was removed.
    pub fn remove_task_from_schedule(&mut self, schedule_id: &str, task_id: &TaskId) -> bool {
        self.last_error = None;
        self.config.simulate_latency();
        let removed = self
            .schedules
            .iter_mut()
            .find(|schedule| schedule.id == schedule_id)
            .map(|schedule| remove_embedded_task(schedule, task_id))
            .unwrap_or(false);
        if removed {
            self.persist();
        }
        removed
    }

    /// Schedules in `phase` at instant `now`.
    ///
    /// Upcoming plans sort by start date; other phases keep list order.
    pub fn schedules_in_phase(&self, phase: SchedulePhase, now: i64) -> Vec<&Schedule> {
        let mut items: Vec<&Schedule> = self
            .schedules
            .iter()
            .filter(|schedule| schedule.phase_at(now) == phase)
            .collect();
        if phase == SchedulePhase::Upcoming {
            items.sort_by_key(|schedule| schedule.start_date);
        }
        items
    }

    /// First schedule whose window contains `now`.
    pub fn current_schedule(&self, now: i64) -> Option<&Schedule> {
        self.schedules
            .iter()
            .find(|schedule| schedule.phase_at(now) == SchedulePhase::Current)
    }

    fn persist(&self) {
        if let Err(err) = self.repo.save_json(storage_keys::SCHEDULES, &self.schedules) {
            warn!("event=storage_save module=schedule status=error error={err}");
        }
    }
}

fn check_window(start_date: i64, end_date: i64) -> ScheduleResult<()> {
    if end_date < start_date {
        return Err(ScheduleError::InvalidWindow {
            start_date,
            end_date,
        });
    }
    Ok(())
}
