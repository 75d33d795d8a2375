//! Session-wide store aggregate.
//!
//! # Responsibility
//! - Instantiate every store once per session over one repository.
//! - Host flows that span stores (create-task form, dashboard).
//!
//! # Invariants
//! - There is no global store state; callers own an `AppStores` value and
//!   pass it by reference.

use crate::model::task::Task;
use crate::repo::kv_repo::KvRepository;
use crate::service::auth_service::AuthService;
use crate::service::chat_service::ChatService;
use crate::service::dashboard::DashboardSummary;
use crate::service::notification_service::NotificationService;
use crate::service::schedule_service::ScheduleService;
use crate::service::task_service::{TaskError, TaskService};
use crate::service::StoreConfig;
use crate::validation::{validate_create_task_form, CreateTaskForm, FormErrors};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of the create-task screen flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateTaskError {
    Form(FormErrors),
    Task(TaskError),
}

impl Display for CreateTaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Form(errors) => write!(f, "{errors}"),
            Self::Task(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CreateTaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Form(errors) => Some(errors),
            Self::Task(err) => Some(err),
        }
    }
}

/// Every store of one app session.
pub struct AppStores<R: KvRepository> {
    pub auth: AuthService<R>,
    pub tasks: TaskService<R>,
    pub schedules: ScheduleService<R>,
    pub chat: ChatService<R>,
    pub notifications: NotificationService<R>,
}

impl<R: KvRepository + Clone> AppStores<R> {
    /// Builds all stores, restoring persisted snapshots where present.
    pub fn open(repo: R, config: StoreConfig) -> Self {
        Self {
            auth: AuthService::new(repo.clone(), config),
            tasks: TaskService::new(repo.clone(), config),
            schedules: ScheduleService::new(repo.clone(), config),
            chat: ChatService::new(repo.clone(), config),
            notifications: NotificationService::new(repo, config),
        }
    }
}

impl<R: KvRepository> AppStores<R> {
    /// Validates create-task form input and adds the resulting task.
    pub fn create_task_from_form(&mut self, form: &CreateTaskForm) -> Result<Task, CreateTaskError> {
        let staff: Vec<_> = self.auth.staff_members().into_iter().cloned().collect();
        let draft = validate_create_task_form(form, &staff).map_err(CreateTaskError::Form)?;
        self.tasks.add_task(draft).map_err(CreateTaskError::Task)
    }

    /// Home screen projection at instant `now`.
    pub fn dashboard(&self, now: i64) -> DashboardSummary {
        DashboardSummary::collect(self, now)
    }
}
