//! Session reconciliation core for gatehouse.
//!
//! This crate merges the independent states of every registered identity
//! provider into the single provider-agnostic session:
//!
//! - **Aggregates**: the three predicates over the provider status vector
//! - **Registry**: priority-ordered provider registration and lookup
//! - **Reconciler**: the state machine driving the session cell and gate
//! - **LoadingGate**: open until reconciliation reaches its first decision
//! - **AuthFacade**: routes sign-out and profile updates to the active
//!   provider
//!
//! # Wiring
//!
//! ```
//! use gatehouse_identity::{SessionContext, change_channel};
//! use gatehouse_reconcile::{ProviderRegistry, Reconciler};
//! use std::sync::Arc;
//!
//! let (notifier, changes) = change_channel();
//! let mut registry = ProviderRegistry::new();
//! // ... register adapters constructed with `notifier.clone()` ...
//! let session = Arc::new(SessionContext::new());
//! let (reconciler, gate, handle) =
//!     Reconciler::new(Arc::new(registry), session.clone(), changes);
//! // tokio::spawn(reconciler.run());
//! ```

pub mod aggregate;
pub mod facade;
pub mod gate;
pub mod reconciler;
pub mod registry;

// Re-export main types at crate root
pub use aggregate::Aggregates;
pub use facade::AuthFacade;
pub use gate::LoadingGate;
pub use reconciler::{Reconciler, ReconcilerHandle};
pub use registry::{ProviderRegistry, RegistryError};
