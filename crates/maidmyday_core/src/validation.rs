//! Form validation for login, registration, profile and create-task flows.
//!
//! # Responsibility
//! - Turn raw form text into per-field error messages the UI shows inline.
//! - Resolve create-task form input into a ready `NewTask` draft.
//!
//! # Invariants
//! - Validation never mutates store state.
//! - Field error messages are stable UI strings.

use crate::model::task::{NewTask, TaskPriority};
use crate::model::user::User;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum password length accepted by registration and password change.
pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email regex"));

/// One inline error attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All field errors of one submitted form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Message for `field`, if that field failed.
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

impl Error for FormErrors {}

/// Raw registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Raw create-task form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskForm {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    /// RFC 3339 timestamp, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD`.
    pub deadline: String,
    /// Staff member display name.
    pub assigned_to: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_login_form(email: &str, password: &str) -> Result<(), FormErrors> {
    let mut errors = FormErrors::default();
    check_email(&mut errors, email);
    if password.is_empty() {
        errors.push("password", "Password is required");
    }
    errors.into_result()
}

pub fn validate_registration_form(form: &RegistrationForm) -> Result<(), FormErrors> {
    let mut errors = FormErrors::default();
    if form.name.trim().is_empty() {
        errors.push("name", "Name is required");
    }
    check_email(&mut errors, &form.email);
    check_new_password(&mut errors, "password", &form.password);
    if form.confirm_password.is_empty() {
        errors.push("confirm_password", "Please confirm your password");
    } else if form.confirm_password != form.password {
        errors.push("confirm_password", "Passwords do not match");
    }
    errors.into_result()
}

pub fn validate_profile_update(name: &str, email: &str) -> Result<(), FormErrors> {
    let mut errors = FormErrors::default();
    if name.trim().is_empty() {
        errors.push("name", "Name is required");
    }
    check_email(&mut errors, email.trim());
    errors.into_result()
}

pub fn validate_password_change(
    current_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<(), FormErrors> {
    let mut errors = FormErrors::default();
    if current_password.is_empty() {
        errors.push("current_password", "Current password is required");
    }
    check_new_password(&mut errors, "new_password", new_password);
    if confirm_password != new_password {
        errors.push("confirm_password", "New passwords do not match");
    }
    errors.into_result()
}

/// Validates the create-task form and resolves the assignee among `staff`.
///
/// Only users with the staff role are valid assignees.
pub fn validate_create_task_form(
    form: &CreateTaskForm,
    staff: &[User],
) -> Result<NewTask, FormErrors> {
    let mut errors = FormErrors::default();

    if form.title.trim().is_empty() {
        errors.push("title", "Title is required");
    }
    if form.description.trim().is_empty() {
        errors.push("description", "Description is required");
    }

    let deadline = if form.deadline.trim().is_empty() {
        errors.push("deadline", "Deadline is required");
        None
    } else {
        let parsed = parse_deadline(&form.deadline);
        if parsed.is_none() {
            errors.push("deadline", "Please enter a valid date");
        }
        parsed
    };

    let assignee_name = form.assigned_to.trim();
    let assignee = if assignee_name.is_empty() {
        errors.push("assigned_to", "Assigned to is required");
        None
    } else {
        let found = staff
            .iter()
            .find(|user| user.is_staff() && user.name == assignee_name);
        if found.is_none() {
            errors.push("assigned_to", "Please select a valid staff member");
        }
        found
    };

    match (deadline, assignee) {
        (Some(deadline), Some(assignee)) if errors.is_empty() => Ok(NewTask {
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            priority: form.priority,
            deadline,
            assigned_to: assignee.name.clone(),
            assigned_to_id: assignee.id.clone(),
            completed: false,
        }),
        _ => Err(errors),
    }
}

/// Parses deadline text into epoch milliseconds (UTC for naive input).
pub fn parse_deadline(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
}

fn check_email(errors: &mut FormErrors, email: &str) {
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.push("email", "Please enter a valid email address");
    }
}

fn check_new_password(errors: &mut FormErrors, field: &'static str, password: &str) {
    if password.is_empty() {
        errors.push(field, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(field, "Password must be at least 6 characters");
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_deadline, validate_create_task_form, validate_login_form,
        validate_registration_form, CreateTaskForm, RegistrationForm,
    };
    use crate::model::task::TaskPriority;
    use crate::seed;

    fn task_form(deadline: &str, assignee: &str) -> CreateTaskForm {
        CreateTaskForm {
            title: " Polish silver ".to_string(),
            description: "Dining room set".to_string(),
            priority: TaskPriority::Medium,
            deadline: deadline.to_string(),
            assigned_to: assignee.to_string(),
        }
    }

    #[test]
    fn login_form_requires_well_formed_email() {
        let errors = validate_login_form("john", "").unwrap_err();
        assert_eq!(
            errors.message_for("email"),
            Some("Please enter a valid email address")
        );
        assert_eq!(errors.message_for("password"), Some("Password is required"));
        assert!(validate_login_form("john@example.com", "password").is_ok());
    }

    #[test]
    fn registration_form_checks_length_and_confirmation() {
        let form = RegistrationForm {
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            password: "12345".to_string(),
            confirm_password: "54321".to_string(),
        };
        let errors = validate_registration_form(&form).unwrap_err();
        assert_eq!(
            errors.message_for("password"),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(
            errors.message_for("confirm_password"),
            Some("Passwords do not match")
        );
        assert!(errors.message_for("name").is_none());
    }

    #[test]
    fn deadline_accepts_rfc3339_and_plain_dates() {
        assert_eq!(parse_deadline("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_deadline("1970-01-01T00:00:01Z"), Some(1_000));
        assert_eq!(parse_deadline("1970-01-01 00:01"), Some(60_000));
        assert!(parse_deadline("next tuesday").is_none());
    }

    #[test]
    fn create_task_form_resolves_staff_assignee() {
        let draft =
            validate_create_task_form(&task_form("2030-05-01", "Maria Garcia"), &seed::users())
                .unwrap();
        assert_eq!(draft.assigned_to_id, "user3");
        assert_eq!(draft.title, "Polish silver");
        assert!(!draft.completed);
    }

    #[test]
    fn create_task_form_rejects_owner_and_bad_date() {
        let errors =
            validate_create_task_form(&task_form("soon", "John Smith"), &seed::users())
                .unwrap_err();
        assert_eq!(errors.message_for("deadline"), Some("Please enter a valid date"));
        assert_eq!(
            errors.message_for("assigned_to"),
            Some("Please select a valid staff member")
        );
    }
}
