//! Auth store: mock login, registration and profile maintenance.
//!
//! # Responsibility
//! - Authenticate against seeded users with the shared mock password.
//! - Keep the signed-in session and persist it under `auth-storage`.
//! - Expose the household directory (owners and staff).
//!
//! # Invariants
//! - This is not a security boundary; credentials are never logged.
//! - Registered users get the owner role and a `user<N+1>` id.

use crate::model::user::{User, UserRole};
use crate::repo::kv_repo::{storage_keys, KvRepository};
use crate::seed::{self, MOCK_PASSWORD};
use crate::service::StoreConfig;
use crate::validation::{
    validate_login_form, validate_password_change, validate_profile_update,
    validate_registration_form, FormErrors, RegistrationForm,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Form input failed field validation.
    Validation(FormErrors),
    InvalidCredentials,
    EmailInUse,
    NotAuthenticated,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::EmailInUse => write!(f, "Email already in use"),
            Self::NotAuthenticated => write!(f, "not signed in"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FormErrors> for AuthError {
    fn from(value: FormErrors) -> Self {
        Self::Validation(value)
    }
}

/// Persisted session shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthSnapshot {
    user: Option<User>,
    is_authenticated: bool,
}

/// Auth store over a key/value repository.
pub struct AuthService<R: KvRepository> {
    repo: R,
    config: StoreConfig,
    users: Vec<User>,
    session: Option<User>,
    last_error: Option<String>,
}

impl<R: KvRepository> AuthService<R> {
    pub fn new(repo: R, config: StoreConfig) -> Self {
        let session = match repo.load_json::<AuthSnapshot>(storage_keys::AUTH) {
            Ok(Some(snapshot)) if snapshot.is_authenticated => snapshot.user,
            Ok(_) => None,
            Err(err) => {
                warn!("event=storage_restore module=auth status=error error={err}");
                None
            }
        };
        Self {
            repo,
            config,
            users: seed::users(),
            session,
            last_error: None,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    /// Users eligible for task assignment.
    pub fn staff_members(&self) -> Vec<&User> {
        self.users.iter().filter(|user| user.is_staff()).collect()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Signs in a seeded user.
    ///
    /// # Errors
    /// - `Validation` for malformed form input.
    /// - `InvalidCredentials` for unknown email or wrong password.
    pub fn login(&mut self, email: &str, password: &str) -> AuthResult<User> {
        self.last_error = None;
        let result = self.authenticate(email, password);
        match &result {
            Ok(user) => {
                self.session = Some(user.clone());
                self.persist();
                info!(
                    "event=auth_login module=auth status=ok user_id={}",
                    user.id
                );
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                info!("event=auth_login module=auth status=rejected");
            }
        }
        result
    }

    /// Creates an owner account and signs it in.
    pub fn register(&mut self, form: &RegistrationForm) -> AuthResult<User> {
        self.last_error = None;
        let result = self.create_account(form);
        match &result {
            Ok(user) => {
                self.session = Some(user.clone());
                self.persist();
                info!(
                    "event=auth_register module=auth status=ok user_id={}",
                    user.id
                );
            }
            Err(err) => self.last_error = Some(err.to_string()),
        }
        result
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.session.take() {
            info!(
                "event=auth_logout module=auth status=ok user_id={}",
                user.id
            );
        }
        self.persist();
    }

    /// Updates display name and email of the signed-in user.
    pub fn update_profile(&mut self, name: &str, email: &str) -> AuthResult<User> {
        validate_profile_update(name, email)?;
        let session = self.session.as_mut().ok_or(AuthError::NotAuthenticated)?;
        session.name = name.trim().to_string();
        session.email = email.trim().to_string();
        let updated = session.clone();

        if let Some(user) = self.users.iter_mut().find(|user| user.id == updated.id) {
            *user = updated.clone();
        }
        self.persist();
        Ok(updated)
    }

    /// Validates a password change for the signed-in user.
    ///
    /// Passwords are not stored; a valid request is only acknowledged.
    pub fn change_password(
        &mut self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> AuthResult<()> {
        if self.session.is_none() {
            return Err(AuthError::NotAuthenticated);
        }
        validate_password_change(current_password, new_password, confirm_password)?;
        self.config.simulate_latency();
        info!("event=auth_change_password module=auth status=ok");
        Ok(())
    }

    fn authenticate(&self, email: &str, password: &str) -> AuthResult<User> {
        validate_login_form(email, password)?;
        self.config.simulate_latency();
        self.users
            .iter()
            .find(|user| user.email == email)
            .filter(|_| password == MOCK_PASSWORD)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)
    }

    fn create_account(&mut self, form: &RegistrationForm) -> AuthResult<User> {
        validate_registration_form(form)?;
        self.config.simulate_latency();
        let email = form.email.trim();
        if self.users.iter().any(|user| user.email == email) {
            return Err(AuthError::EmailInUse);
        }

        let user = User {
            id: format!("user{}", self.users.len() + 1),
            name: form.name.trim().to_string(),
            email: email.to_string(),
            role: UserRole::Owner,
            avatar: None,
        };
        self.users.push(user.clone());
        Ok(user)
    }

    fn persist(&self) {
        let snapshot = AuthSnapshot {
            user: self.session.clone(),
            is_authenticated: self.session.is_some(),
        };
        if let Err(err) = self.repo.save_json(storage_keys::AUTH, &snapshot) {
            warn!("event=storage_save module=auth status=error error={err}");
        }
    }
}
