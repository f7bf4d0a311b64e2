//! Session service implementation
//!
//! Holds the current user, compares sign-in attempts against the single
//! static admin credential and persists the session under its own key.
//! This is a role switch for presentation flows, not a security boundary.

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::AdminConfig;
use crate::models::{SignInRequest, StudentSnapshot, User};
use crate::storage::PersistenceAdapter;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::helpers::{name_from_email, normalize_email};
use crate::utils::logging::log_admin_action;
use crate::utils::validation;

pub struct SessionService {
    current: RwLock<Option<User>>,
    persistence: PersistenceAdapter,
    admin: AdminConfig,
}

impl SessionService {
    pub fn new(persistence: PersistenceAdapter, admin: AdminConfig) -> Self {
        Self {
            current: RwLock::new(None),
            persistence,
            admin,
        }
    }

    /// Rehydrate the stored session, if any. A corrupt or unreadable session
    /// leaves the service signed out.
    pub async fn restore(&self) -> Option<User> {
        let stored = match self.persistence.load_session().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Failed to restore session");
                None
            }
        };

        if let Some(user) = &stored {
            debug!(user_id = %user.id, is_admin = user.is_admin, "Session restored");
        }
        *self.current.write().await = stored.clone();
        stored
    }

    /// Sign in as the admin or as a student.
    ///
    /// The admin email (case-insensitive) must come with the admin password.
    /// Any other valid email and non-empty password signs in a student whose
    /// id is the normalized email.
    pub async fn sign_in(&self, request: SignInRequest) -> Result<User> {
        validation::validate_sign_in(&request)?;

        let email = normalize_email(&request.email);
        let user = if email == normalize_email(&self.admin.email) {
            if request.password != self.admin.password {
                warn!(email = %email, "Admin sign-in rejected");
                return Err(CampusEventsError::Authentication("Invalid admin credentials".to_string()));
            }
            log_admin_action(&email, "sign_in", None);
            User {
                id: email.clone(),
                name: self.admin.name.clone(),
                email,
                is_admin: true,
                roll_number: None,
                branch: None,
                year: None,
            }
        } else {
            let name = request
                .name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| name_from_email(&email));
            User {
                id: email.clone(),
                name,
                email,
                is_admin: false,
                roll_number: request.roll_number.filter(|r| !r.trim().is_empty()),
                branch: request.branch.filter(|b| !b.trim().is_empty()),
                year: request.year,
            }
        };

        // Memory first; a failed write still leaves the user signed in.
        *self.current.write().await = Some(user.clone());
        info!(user_id = %user.id, is_admin = user.is_admin, "User signed in");
        self.persistence.save_session(&user).await?;
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<()> {
        let previous = self.current.write().await.take();
        if let Some(user) = previous {
            info!(user_id = %user.id, "User signed out");
        }
        self.persistence.clear_session().await
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    pub async fn is_admin(&self) -> bool {
        self.current.read().await.as_ref().is_some_and(|user| user.is_admin)
    }

    pub async fn require_user(&self) -> Result<User> {
        self.current_user()
            .await
            .ok_or_else(|| CampusEventsError::Authentication("Sign in required".to_string()))
    }

    /// The signed-in admin, or `PermissionDenied`
    pub async fn require_admin(&self) -> Result<User> {
        let user = self.require_user().await?;
        if !user.is_admin {
            warn!(user_id = %user.id, "Admin action denied");
            return Err(CampusEventsError::PermissionDenied(
                "Administrator access required".to_string(),
            ));
        }
        Ok(user)
    }

    /// Snapshot of the signed-in user for registration records
    pub async fn student_snapshot(&self) -> Result<StudentSnapshot> {
        Ok(self.require_user().await?.snapshot())
    }
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("persistence", &self.persistence)
            .field("admin_email", &self.admin.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn admin() -> AdminConfig {
        AdminConfig {
            email: "admin@campus.edu".to_string(),
            password: "admin123".to_string(),
            name: "Administrator".to_string(),
        }
    }

    fn request(email: &str, password: &str) -> SignInRequest {
        SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_admin_sign_in() {
        let session = SessionService::new(PersistenceAdapter::in_memory(), admin());
        let user = session.sign_in(request("Admin@Campus.edu", "admin123")).await.unwrap();
        assert!(user.is_admin);
        assert_eq!(user.name, "Administrator");
        assert!(session.require_admin().await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_email_with_wrong_password_is_rejected() {
        let session = SessionService::new(PersistenceAdapter::in_memory(), admin());
        let result = session.sign_in(request("admin@campus.edu", "guess")).await;
        assert_matches!(result, Err(CampusEventsError::Authentication(_)));
        assert!(session.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_student_sign_in_derives_id_and_name() {
        let session = SessionService::new(PersistenceAdapter::in_memory(), admin());
        let user = session.sign_in(request(" Riya.Sharma@Campus.edu ", "pw")).await.unwrap();
        assert_eq!(user.id, "riya.sharma@campus.edu");
        assert_eq!(user.name, "Riya Sharma");
        assert!(!user.is_admin);
        assert_matches!(session.require_admin().await, Err(CampusEventsError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_sign_in_validation_errors() {
        let session = SessionService::new(PersistenceAdapter::in_memory(), admin());
        let result = session.sign_in(request("not-an-email", "")).await;
        assert_matches!(result, Err(CampusEventsError::Validation(e)) if e.contains("email") && e.contains("password"));
    }

    #[tokio::test]
    async fn test_session_survives_restart_and_sign_out_clears_it() {
        let adapter = PersistenceAdapter::in_memory();
        let session = SessionService::new(adapter.clone(), admin());
        let user = session.sign_in(request("sam@campus.edu", "pw")).await.unwrap();

        let restarted = SessionService::new(adapter.clone(), admin());
        assert_eq!(restarted.restore().await, Some(user));

        restarted.sign_out().await.unwrap();
        assert!(restarted.current_user().await.is_none());
        let again = SessionService::new(adapter, admin());
        assert_eq!(again.restore().await, None);
    }
}
