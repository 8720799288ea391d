//! Aggregate predicates over the provider status vector.
//!
//! The reconciler never tracks these incrementally; it recomputes them from
//! the full vector on every evaluation so a stale flag can never survive a
//! status flip.

use gatehouse_identity::ProviderStatus;

/// The three aggregate predicates the transition rules branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregates {
    /// At least one adapter has not reached a decision.
    pub any_configuring: bool,
    /// At least one adapter has a signed-in user.
    pub any_authenticated: bool,
    /// Every adapter has decided no user is signed in.
    ///
    /// False for an empty vector, so a registry with no providers resolves
    /// through the fallback rule instead of the sign-out rule.
    pub all_unauthenticated: bool,
}

impl Aggregates {
    /// Computes the aggregates for a status vector.
    #[must_use]
    pub fn of(statuses: &[ProviderStatus]) -> Self {
        Self {
            any_configuring: statuses.iter().any(ProviderStatus::is_configuring),
            any_authenticated: statuses.iter().any(ProviderStatus::is_authenticated),
            all_unauthenticated: !statuses.is_empty()
                && statuses.iter().all(ProviderStatus::is_unauthenticated),
        }
    }
}
