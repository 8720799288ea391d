//! Shared adapter state cell.
//!
//! Every adapter owns one cell: its status, its provider-native user, and
//! the change notifier. Status and user always move together so the
//! reconciler can never observe an authenticated adapter mid-update.

use gatehouse_core::ProviderName;
use gatehouse_identity::{ChangeNotifier, ProviderStatus, SourceUser};
use std::sync::RwLock;

/// Status + current user for one adapter, with change notification.
#[derive(Debug)]
pub(crate) struct AdapterCell {
    name: ProviderName,
    state: RwLock<(ProviderStatus, Option<SourceUser>)>,
    notifier: ChangeNotifier,
}

impl AdapterCell {
    /// Creates a cell in the configuring state.
    pub(crate) fn new(name: ProviderName, notifier: ChangeNotifier) -> Self {
        Self {
            name,
            state: RwLock::new((ProviderStatus::Configuring, None)),
            notifier,
        }
    }

    pub(crate) fn name(&self) -> ProviderName {
        self.name
    }

    pub(crate) fn status(&self) -> ProviderStatus {
        self.state.read().unwrap().0
    }

    pub(crate) fn current_user(&self) -> Option<SourceUser> {
        self.state.read().unwrap().1.clone()
    }

    /// Settles the adapter as authenticated with the given user.
    pub(crate) fn settle_authenticated(&self, user: SourceUser) {
        tracing::debug!(provider = %self.name, uid = %user.uid, "adapter authenticated");
        *self.state.write().unwrap() = (ProviderStatus::Authenticated, Some(user));
        self.notifier.notify(self.name);
    }

    /// Settles the adapter as unauthenticated.
    pub(crate) fn settle_unauthenticated(&self) {
        tracing::debug!(provider = %self.name, "adapter unauthenticated");
        *self.state.write().unwrap() = (ProviderStatus::Unauthenticated, None);
        self.notifier.notify(self.name);
    }
}
