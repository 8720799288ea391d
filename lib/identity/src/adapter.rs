//! The provider adapter contract and change notification channel.
//!
//! Each identity backend is wrapped behind [`ProviderAdapter`]: a status
//! value, the current provider-native user, and the outgoing sign-out and
//! profile-update operations. Adapters push a wakeup through a
//! [`ChangeNotifier`] whenever their observable state changes; the
//! reconciler reads live state on wakeup rather than trusting the event
//! payload, so stale notifications are harmless.

use crate::error::ProviderError;
use crate::status::ProviderStatus;
use crate::user::{SourceUser, UserPatch};
use async_trait::async_trait;
use gatehouse_core::{ProviderName, Result};
use tokio::sync::mpsc;

/// Uniform wrapper around one identity backend.
///
/// Contract:
/// - `status` starts at [`ProviderStatus::Configuring`] and must eventually
///   settle; an adapter whose backend check fails settles to
///   `Unauthenticated` instead of staying undecided.
/// - `current_user` returns a value whenever `status` is `Authenticated`.
/// - `sign_out` is best-effort; local adapter state drops to
///   `Unauthenticated` even when the backend call fails.
/// - `update_user` is optional; the default implementation silently drops
///   the patch.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Returns this adapter's provider identifier.
    fn name(&self) -> ProviderName;

    /// Returns the adapter's current status.
    fn status(&self) -> ProviderStatus;

    /// Returns the provider-native user, if one is signed in.
    fn current_user(&self) -> Option<SourceUser>;

    /// Signs the user out of this provider's backend.
    ///
    /// # Errors
    ///
    /// Returns an error report if the backend call fails; callers treat
    /// this as non-fatal.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Applies a profile update through this provider's backend.
    ///
    /// Adapters without update support inherit this no-op; the resulting
    /// state change (if any) flows back through the adapter's own change
    /// notification, never directly into the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    async fn update_user(&self, _patch: UserPatch) -> Result<(), ProviderError> {
        tracing::debug!(provider = %self.name(), "provider does not support profile updates");
        Ok(())
    }
}

/// Sender half of the adapter change channel.
///
/// Cloned into every adapter at construction. Sends never block and are
/// silently dropped once the reconciler has shut down, so a late backend
/// callback cannot reach torn-down state.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: mpsc::UnboundedSender<ProviderName>,
}

impl ChangeNotifier {
    /// Signals that the named provider's observable state changed.
    pub fn notify(&self, provider: ProviderName) {
        if self.tx.send(provider).is_err() {
            tracing::debug!(%provider, "change notification dropped: reconciler has shut down");
        }
    }
}

/// Receiver half of the adapter change channel, consumed by the reconciler.
pub type ChangeReceiver = mpsc::UnboundedReceiver<ProviderName>;

/// Creates the adapter→reconciler change channel.
#[must_use]
pub fn change_channel() -> (ChangeNotifier, ChangeReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChangeNotifier { tx }, rx)
}
