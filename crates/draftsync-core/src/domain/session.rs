//! Session state and the sync status state machine
//!
//! Authentication state is passed explicitly as a [`Session`] value, and
//! reconciliation is driven by [`SessionEvent`]s rather than by observing
//! ambient state.
//!
//! ## State Machine
//!
//! ```text
//!  ┌─────────────────┐  signed in   ┌─────────────┐  merged / fetch failed  ┌──────┐
//!  │ Unauthenticated │ ───────────► │ Reconciling │ ──────────────────────► │ Idle │
//!  └─────────────────┘              └─────────────┘                         └──────┘
//!          ▲                               │ signed out                        │
//!          └───────────────────────────────┴───────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::SessionId;

/// Authentication state supplied by the caller on each operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "session_id")]
pub enum Session {
    /// No credentials; all operations are local-only
    #[default]
    Anonymous,
    /// Credentials present; remote calls are issued
    Authenticated(SessionId),
}

impl Session {
    /// Returns true if remote calls should be issued
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    /// Returns the session identity, if authenticated
    pub fn id(&self) -> Option<SessionId> {
        match self {
            Session::Authenticated(id) => Some(*id),
            Session::Anonymous => None,
        }
    }
}

/// An authentication transition observed by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Credentials were acquired for the given session
    SignedIn(SessionId),
    /// Credentials were lost or revoked
    SignedOut,
}

/// Session-relative synchronization status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "session_id")]
pub enum SyncStatus {
    /// Reads and writes go to the local store only
    #[default]
    Unauthenticated,
    /// Remote fetch and merge in progress for the session
    Reconciling(SessionId),
    /// Merge complete for the session
    Idle(SessionId),
}

impl SyncStatus {
    /// Returns true while a reconciliation pass is in flight
    pub fn is_reconciling(&self) -> bool {
        matches!(self, SyncStatus::Reconciling(_))
    }

    /// Returns true if at least one reconciliation completed for the session
    pub fn is_idle(&self) -> bool {
        matches!(self, SyncStatus::Idle(_))
    }

    /// Returns the session the status refers to
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            SyncStatus::Reconciling(id) | SyncStatus::Idle(id) => Some(*id),
            SyncStatus::Unauthenticated => None,
        }
    }

    /// Returns the state name for display and logging
    pub fn name(&self) -> &'static str {
        match self {
            SyncStatus::Unauthenticated => "unauthenticated",
            SyncStatus::Reconciling(_) => "reconciling",
            SyncStatus::Idle(_) => "idle",
        }
    }

    /// Enters `Reconciling` for a newly signed-in session
    ///
    /// Allowed from any state: a sign-in for a different session restarts
    /// reconciliation for that session.
    pub fn begin_reconcile(&mut self, session: SessionId) {
        *self = SyncStatus::Reconciling(session);
    }

    /// Completes reconciliation for `session`
    ///
    /// # Errors
    /// Returns `DomainError::InvalidState` unless currently reconciling
    /// the same session
    pub fn complete_reconcile(&mut self, session: SessionId) -> Result<(), DomainError> {
        match self {
            SyncStatus::Reconciling(current) if *current == session => {
                *self = SyncStatus::Idle(session);
                Ok(())
            }
            other => Err(DomainError::InvalidState {
                from: other.name().to_string(),
                to: "idle".to_string(),
            }),
        }
    }

    /// Drops back to `Unauthenticated`
    pub fn sign_out(&mut self) {
        *self = SyncStatus::Unauthenticated;
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::Unauthenticated => write!(f, "unauthenticated"),
            SyncStatus::Reconciling(id) => write!(f, "reconciling ({id})"),
            SyncStatus::Idle(id) => write!(f, "idle ({id})"),
        }
    }
}
