//! The session reconciler.
//!
//! Observes every registered provider adapter and merges their independent
//! states into the single session cell. The reconciler is the only writer
//! of [`SessionContext`] and the only component that closes the loading
//! gate.
//!
//! # Evaluation model
//!
//! The reconciler never polls. Adapters send a wakeup on the change channel
//! whenever their observable state changes; the reconciler drains every
//! pending wakeup and then evaluates once against the adapters' *live*
//! status vector. A notification therefore never carries state of its own,
//! and an evaluation can never act on a snapshot that a faster adapter has
//! already superseded.
//!
//! # Transition rules
//!
//! Evaluated in priority order on every wakeup:
//!
//! 1. any adapter configuring → no action; the gate keeps its position.
//! 2. every adapter unauthenticated → sign out the active provider (if
//!    any) and close the gate.
//! 3. any adapter authenticated → sign in the highest-priority
//!    authenticated adapter with a usable user, then close the gate.
//! 4. otherwise (empty or inconsistent vector) → close the gate without
//!    touching the session.

use crate::aggregate::Aggregates;
use crate::gate::{GateController, LoadingGate};
use crate::registry::ProviderRegistry;
use gatehouse_identity::{ChangeReceiver, SessionContext, UnifiedUser};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::instrument;

/// Handle for stopping a running reconciler.
///
/// Dropping the handle does not stop the reconciler; call
/// [`ReconcilerHandle::shutdown`] explicitly during application teardown so
/// no late adapter callback can reach a torn-down session.
#[derive(Debug)]
pub struct ReconcilerHandle {
    shutdown_tx: watch::Sender<bool>,
}

impl ReconcilerHandle {
    /// Signals the reconciler loop to stop after its current evaluation.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// The session reconciliation state machine.
pub struct Reconciler {
    registry: Arc<ProviderRegistry>,
    session: Arc<SessionContext>,
    gate: GateController,
    changes: ChangeReceiver,
    shutdown_rx: watch::Receiver<bool>,
}

impl Reconciler {
    /// Creates a reconciler over the given registry and session cell.
    ///
    /// `changes` is the receiver half of the channel whose
    /// [`ChangeNotifier`](gatehouse_identity::ChangeNotifier) was cloned
    /// into the adapters at construction.
    #[must_use]
    pub fn new(
        registry: Arc<ProviderRegistry>,
        session: Arc<SessionContext>,
        changes: ChangeReceiver,
    ) -> (Self, LoadingGate, ReconcilerHandle) {
        let (gate, loading_gate) = GateController::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let reconciler = Self {
            registry,
            session,
            gate,
            changes,
            shutdown_rx,
        };
        (reconciler, loading_gate, ReconcilerHandle { shutdown_tx })
    }

    /// Runs the reconciliation loop until shutdown.
    ///
    /// Performs one evaluation up front (an empty registry resolves
    /// immediately; a populated one is still configuring), then reacts to
    /// adapter change notifications.
    pub async fn run(mut self) {
        self.evaluate().await;

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => break,
                changed = self.changes.recv() => match changed {
                    Some(_) => {
                        // Coalesce bursts: act once on the latest state.
                        while self.changes.try_recv().is_ok() {}
                        self.evaluate().await;
                    }
                    None => break,
                },
            }
        }

        tracing::debug!("reconciler stopped");
    }

    /// Performs a single evaluation against the live adapter states.
    #[instrument(skip(self))]
    pub async fn evaluate(&self) {
        let statuses: Vec<_> = self
            .registry
            .adapters()
            .map(|adapter| adapter.status())
            .collect();
        let aggregates = Aggregates::of(&statuses);
        tracing::trace!(?statuses, ?aggregates, "evaluating provider states");

        if aggregates.any_configuring {
            return;
        }

        if aggregates.all_unauthenticated {
            self.sign_out_active().await;
            self.gate.close();
            return;
        }

        if aggregates.any_authenticated {
            self.sign_in_by_priority();
            self.gate.close();
            return;
        }

        // Nothing configuring, nothing authenticated, vector empty: settle
        // as signed out without touching the session.
        self.gate.close();
    }

    /// Signs in the highest-priority authenticated adapter.
    ///
    /// Walks the registry in priority order; the first authenticated
    /// adapter with a usable user wins, regardless of which adapter's
    /// notification arrived last. An adapter claiming authentication
    /// without a user is skipped and the next candidate is tried.
    fn sign_in_by_priority(&self) {
        for adapter in self.registry.adapters() {
            if !adapter.status().is_authenticated() {
                continue;
            }
            let name = adapter.name();
            let Some(source) = adapter.current_user() else {
                tracing::warn!(provider = %name, "authenticated adapter reported no user");
                continue;
            };

            let user = UnifiedUser::from_source(source);
            let current = self.session.get();
            if current.active_provider() == Some(name) && current.user() == Some(&user) {
                tracing::debug!(provider = %name, "session already current");
            } else {
                self.session.set(name, user);
                tracing::info!(provider = %name, "signed in");
            }
            return;
        }

        tracing::warn!("no authenticated adapter produced a usable session");
    }

    /// Clears the session and delegates sign-out to the active provider.
    ///
    /// No-op when nothing is active, so repeated all-unauthenticated
    /// evaluations clear at most once and delegate at most once. The
    /// delegation is best-effort: a backend failure is logged and the local
    /// session stays cleared.
    async fn sign_out_active(&self) {
        let current = self.session.get();
        let Some(provider) = current.active_provider() else {
            return;
        };

        self.session.clear();
        tracing::info!(%provider, "signed out");

        match self.registry.get(provider) {
            Some(adapter) => {
                if let Err(error) = adapter.sign_out().await {
                    tracing::warn!(%provider, %error, "sign-out delegation failed; local session cleared anyway");
                }
            }
            None => {
                tracing::warn!(%provider, "active provider missing from registry");
            }
        }
    }
}
