//! The loading gate.
//!
//! Open while reconciliation has not reached its first decision; closed
//! forever after. The application shell renders a placeholder while the
//! gate is open and must not render protected content until it closes.

use tokio::sync::watch;

/// Writer side of the gate, owned by the reconciler.
#[derive(Debug)]
pub(crate) struct GateController {
    tx: watch::Sender<bool>,
}

impl GateController {
    /// Creates an open gate and its observer handle.
    pub(crate) fn new() -> (Self, LoadingGate) {
        let (tx, rx) = watch::channel(true);
        (Self { tx }, LoadingGate { rx })
    }

    /// Closes the gate. Closing an already-closed gate is a no-op.
    pub(crate) fn close(&self) {
        let closed_now = self.tx.send_if_modified(|open| {
            if *open {
                *open = false;
                true
            } else {
                false
            }
        });
        if closed_now {
            tracing::debug!("loading gate closed");
        }
    }
}

/// Read-only observer of the loading gate.
///
/// Cheap to clone; every consumer gets a coherent view of the same gate.
#[derive(Debug, Clone)]
pub struct LoadingGate {
    rx: watch::Receiver<bool>,
}

impl LoadingGate {
    /// Returns true while reconciliation has not reached a decision.
    #[must_use]
    pub fn is_open(&self) -> bool {
        *self.rx.borrow()
    }

    /// Waits until the gate closes.
    ///
    /// Returns immediately if the gate is already closed. Also returns if
    /// the reconciler shuts down without deciding, so waiters are never
    /// stranded.
    pub async fn wait_closed(&mut self) {
        while *self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                break;
            }
        }
    }
}
