//! Session state and role gating
//!
//! [`AuthContext`] is the one process-wide piece of auth state, modelled as an
//! explicit context object with a defined lifecycle: constructed unresolved,
//! [`AuthContext::initialize`] resolves the backend session, sign-in/out
//! update it, and consumers (router, pages, navbar) receive it by injection.
//!
//! Until initialization completes the status is [`SessionStatus::Resolving`]
//! and the router renders a loading placeholder — indefinitely, if resolution
//! never completes.

use crate::backend::Backend;
use crate::core::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Role attached to a user account
///
/// Only `Employer` may create, edit, or delete schedule records; everyone
/// else sees schedules read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Employer,
    Employee,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Employer => write!(f, "employer"),
            UserRole::Employee => write!(f, "employee"),
        }
    }
}

/// An established backend session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub access_token: String,
}

/// Where session resolution currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Initial resolution has not completed yet
    Resolving,
    /// Resolution completed with no session
    SignedOut,
    /// A session is established
    SignedIn,
}

#[derive(Debug, Default)]
struct AuthState {
    session: Option<Session>,
    resolved: bool,
}

/// Explicit auth context: current user/role plus sign-in/out operations
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct AuthContext {
    backend: Arc<dyn Backend>,
    state: Arc<RwLock<AuthState>>,
}

impl AuthContext {
    /// Create an unresolved context (status starts at `Resolving`)
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(AuthState::default())),
        }
    }

    /// Resolve the current backend session
    ///
    /// Called once at app start. Errors leave the context signed out but
    /// resolved, so the router stops showing the loading placeholder.
    pub async fn initialize(&self) {
        let session = match self.backend.current_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "session resolution failed");
                None
            }
        };
        let mut state = self.write();
        state.session = session;
        state.resolved = true;
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.backend.sign_in(email, password).await?;
        let mut state = self.write();
        state.session = Some(session.clone());
        state.resolved = true;
        Ok(session)
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<Session, AuthError> {
        let session = self.backend.sign_up(email, password, name, role).await?;
        let mut state = self.write();
        state.session = Some(session.clone());
        state.resolved = true;
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.backend.sign_out().await?;
        self.write().session = None;
        Ok(())
    }

    /// Current session, `None` until one is established
    pub fn user(&self) -> Option<Session> {
        self.read().session.clone()
    }

    /// Role of the current user, if signed in
    pub fn role(&self) -> Option<UserRole> {
        self.read().session.as_ref().map(|s| s.role)
    }

    pub fn status(&self) -> SessionStatus {
        let state = self.read();
        if !state.resolved {
            SessionStatus::Resolving
        } else if state.session.is_some() {
            SessionStatus::SignedIn
        } else {
            SessionStatus::SignedOut
        }
    }

    /// Role gate for schedule management (create/edit/delete)
    pub fn can_manage_schedules(&self) -> bool {
        self.role() == Some(UserRole::Employer)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}
