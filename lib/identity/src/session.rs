//! The process-wide session cell.
//!
//! [`SessionContext`] holds the currently active provider and the resolved
//! unified user. Writes are atomic replacements of the whole snapshot and
//! come from a single writer (the reconciler); any number of readers take
//! owned snapshots, never references into the cell.

use crate::user::UnifiedUser;
use chrono::{DateTime, Utc};
use gatehouse_core::ProviderName;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// An immutable view of the session at one point in time.
///
/// Invariant: `is_authenticated` is true exactly when both the active
/// provider and the user are present. Snapshots are only constructed by
/// [`SessionContext::set`] and [`SessionSnapshot::empty`], so the invariant
/// holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// The provider that produced the current session, if any.
    active_provider: Option<ProviderName>,
    /// The resolved user, if signed in.
    user: Option<UnifiedUser>,
    /// Whether a user is currently signed in.
    is_authenticated: bool,
    /// When the current session was established.
    signed_in_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    /// The signed-out snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            active_provider: None,
            user: None,
            is_authenticated: false,
            signed_in_at: None,
        }
    }

    /// Returns the active provider, if signed in.
    #[must_use]
    pub fn active_provider(&self) -> Option<ProviderName> {
        self.active_provider
    }

    /// Returns the resolved user, if signed in.
    #[must_use]
    pub fn user(&self) -> Option<&UnifiedUser> {
        self.user.as_ref()
    }

    /// Returns true if a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// Returns when the session was established, if signed in.
    #[must_use]
    pub fn signed_in_at(&self) -> Option<DateTime<Utc>> {
        self.signed_in_at
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Process-wide holder of the resolved session.
///
/// Single-writer discipline: only the reconciler calls [`set`] and
/// [`clear`]. Readers call [`get`] and receive an owned snapshot that stays
/// coherent regardless of later writes.
///
/// [`set`]: SessionContext::set
/// [`clear`]: SessionContext::clear
/// [`get`]: SessionContext::get
#[derive(Debug)]
pub struct SessionContext {
    inner: RwLock<SessionSnapshot>,
}

impl SessionContext {
    /// Creates an empty (signed-out) session context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(SessionSnapshot::empty()),
        }
    }

    /// Returns an owned snapshot of the current session.
    #[must_use]
    pub fn get(&self) -> SessionSnapshot {
        self.inner.read().unwrap().clone()
    }

    /// Replaces the session with a signed-in snapshot.
    ///
    /// Both fields are written together; there is no intermediate state in
    /// which only one of them has changed.
    pub fn set(&self, provider: ProviderName, user: UnifiedUser) {
        let snapshot = SessionSnapshot {
            active_provider: Some(provider),
            user: Some(user),
            is_authenticated: true,
            signed_in_at: Some(Utc::now()),
        };
        *self.inner.write().unwrap() = snapshot;
    }

    /// Resets the session to its signed-out state.
    pub fn clear(&self) {
        *self.inner.write().unwrap() = SessionSnapshot::empty();
    }

    /// Returns true if a user is currently signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().unwrap().is_authenticated
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::SourceUser;

    fn test_user() -> UnifiedUser {
        UnifiedUser::from_source(SourceUser::new("u1").with_email("alice@example.com"))
    }

    #[test]
    fn new_context_is_signed_out() {
        let context = SessionContext::new();
        let snapshot = context.get();

        assert!(!snapshot.is_authenticated());
        assert!(snapshot.active_provider().is_none());
        assert!(snapshot.user().is_none());
        assert!(snapshot.signed_in_at().is_none());
    }

    #[test]
    fn set_updates_both_fields_together() {
        let context = SessionContext::new();
        context.set(ProviderName::Firebase, test_user());

        let snapshot = context.get();
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.active_provider(), Some(ProviderName::Firebase));
        assert_eq!(snapshot.user().map(UnifiedUser::email), Some("alice@example.com"));
        assert!(snapshot.signed_in_at().is_some());
    }

    #[test]
    fn clear_returns_to_empty_state() {
        let context = SessionContext::new();
        context.set(ProviderName::Jwt, test_user());
        context.clear();

        assert_eq!(context.get(), SessionSnapshot::empty());
    }

    #[test]
    fn snapshots_outlive_later_writes() {
        let context = SessionContext::new();
        context.set(ProviderName::Supabase, test_user());

        let before = context.get();
        context.clear();

        assert!(before.is_authenticated());
        assert!(!context.get().is_authenticated());
    }

    #[test]
    fn snapshot_serializes_downstream_shape() {
        let context = SessionContext::new();
        context.set(ProviderName::Firebase, test_user());

        let json = serde_json::to_value(context.get()).expect("serialize");
        assert_eq!(json["activeProvider"], "firebase");
        assert_eq!(json["isAuthenticated"], true);
        assert_eq!(json["user"]["email"], "alice@example.com");
    }

    #[test]
    fn empty_snapshot_serializes_signed_out_shape() {
        let json = serde_json::to_value(SessionSnapshot::empty()).expect("serialize");
        assert_eq!(json["activeProvider"], serde_json::Value::Null);
        assert_eq!(json["isAuthenticated"], false);
    }
}
