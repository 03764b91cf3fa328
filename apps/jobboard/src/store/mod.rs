//! Client-side store: the logged-in session, shared through `AppState`.
//!
//! The store is the only owner of the token and user. The API client reads the token
//! from here on every request and clears the session here on any 401.

pub mod persist;

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::errors::ClientError;
use crate::models::{Role, User};
use crate::store::persist::{AuthSnapshot, PersistedSnapshot, RootSnapshot, StateFile};

const NOT_LOGGED_IN: &str = "Not logged in";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
}

/// What the current session is allowed to see. Views take this instead of the user
/// so the resume gate is applied in one place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewer {
    pub role: Option<Role>,
    pub has_resume: bool,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.role.is_some()
    }

    pub fn for_user(user: &User) -> Self {
        Self {
            role: Some(user.role),
            has_resume: user.has_resume(),
        }
    }
}

pub struct Store {
    state: RwLock<SessionState>,
    file: Option<StateFile>,
}

impl Store {
    /// Opens the store backed by the state file at `path`, restoring any saved session.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let file = StateFile::new(path);
        let snapshot = file.load()?;

        let state = SessionState {
            token: snapshot.token,
            user: snapshot.root.auth.user,
        };
        if state.token.is_some() {
            info!("Restored session from {}", file.path().display());
        }

        Ok(Self {
            state: RwLock::new(state),
            file: Some(file),
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            file: None,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn viewer(&self) -> Viewer {
        self.read()
            .user
            .as_ref()
            .map(Viewer::for_user)
            .unwrap_or_default()
    }

    pub fn set_session(&self, token: String, user: User) -> Result<(), ClientError> {
        let snapshot = {
            let mut state = self.write();
            state.token = Some(token);
            state.user = Some(user);
            state.clone()
        };
        self.persist(&snapshot)
    }

    /// Replaces the user (e.g. after `/auth/me` or a resume upload) keeping the token.
    pub fn update_user(&self, user: User) -> Result<(), ClientError> {
        let snapshot = {
            let mut state = self.write();
            state.user = Some(user);
            state.clone()
        };
        self.persist(&snapshot)
    }

    /// Records the resume reference returned by an upload on the current user.
    pub fn set_resume_id(&self, resume_id: String) -> Result<(), ClientError> {
        let snapshot = {
            let mut state = self.write();
            match state.user.as_mut() {
                Some(user) => user.resume_id = Some(resume_id),
                None => return Err(ClientError::Unauthorized(NOT_LOGGED_IN.to_string())),
            }
            state.clone()
        };
        self.persist(&snapshot)
    }

    /// Drops token and user, in memory and on disk. Never fails: a leftover state file
    /// is logged, and its token is rejected by the backend on next use anyway.
    pub fn clear_session(&self) {
        *self.write() = SessionState::default();
        if let Some(file) = &self.file {
            if let Err(e) = file.remove() {
                warn!("Failed to remove state file {}: {e}", file.path().display());
            }
        }
    }

    pub fn require_user(&self) -> Result<User, ClientError> {
        self.current_user()
            .ok_or_else(|| ClientError::Unauthorized(NOT_LOGGED_IN.to_string()))
    }

    pub fn require_role(&self, role: Role) -> Result<User, ClientError> {
        let user = self.require_user()?;
        if user.role != role {
            return Err(ClientError::Forbidden(format!(
                "this action is only available to a {}",
                role.label()
            )));
        }
        Ok(user)
    }

    /// Precondition for applying and for anything that shows fit scores.
    pub fn require_resume(&self) -> Result<User, ClientError> {
        let user = self.require_role(Role::JobSeeker)?;
        if !user.has_resume() {
            return Err(ClientError::Validation(
                "Upload a resume first (jobboard upload-resume <file>).".to_string(),
            ));
        }
        Ok(user)
    }

    fn persist(&self, state: &SessionState) -> Result<(), ClientError> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        file.save(&PersistedSnapshot {
            token: state.token.clone(),
            root: RootSnapshot {
                auth: AuthSnapshot {
                    user: state.user.clone(),
                },
            },
        })
    }
}
