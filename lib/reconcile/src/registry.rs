//! Provider adapter registry.
//!
//! Registration order doubles as the priority order: when several providers
//! report authenticated at once, the earliest-registered one wins. This is
//! what makes concurrent sign-ins deterministic instead of
//! last-completed-wins.

use gatehouse_core::ProviderName;
use gatehouse_identity::ProviderAdapter;
use std::fmt;
use std::sync::Arc;

/// Errors from registry construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A provider was registered twice.
    DuplicateProvider { provider: ProviderName },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateProvider { provider } => {
                write!(f, "provider '{provider}' is already registered")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// The set of registered provider adapters, in priority order.
#[derive(Default)]
pub struct ProviderRegistry {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter at the next (lowest remaining) priority.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter for the same provider is already
    /// registered.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) -> Result<(), RegistryError> {
        let name = adapter.name();
        if self.get(name).is_some() {
            return Err(RegistryError::DuplicateProvider { provider: name });
        }
        tracing::debug!(provider = %name, priority = self.adapters.len(), "registered provider");
        self.adapters.push(adapter);
        Ok(())
    }

    /// Looks up the adapter for a provider.
    #[must_use]
    pub fn get(&self, name: ProviderName) -> Option<&Arc<dyn ProviderAdapter>> {
        self.adapters.iter().find(|adapter| adapter.name() == name)
    }

    /// Iterates adapters in priority order (registration order).
    pub fn adapters(&self) -> impl Iterator<Item = &Arc<dyn ProviderAdapter>> {
        self.adapters.iter()
    }

    /// Returns the number of registered adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns true if no adapters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.adapters.iter().map(|adapter| adapter.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gatehouse_identity::{ProviderError, ProviderStatus, SourceUser};
    use rootcause::Report;

    struct NamedAdapter(ProviderName);

    #[async_trait]
    impl ProviderAdapter for NamedAdapter {
        fn name(&self) -> ProviderName {
            self.0
        }

        fn status(&self) -> ProviderStatus {
            ProviderStatus::Configuring
        }

        fn current_user(&self) -> Option<SourceUser> {
            None
        }

        async fn sign_out(&self) -> Result<(), Report<ProviderError>> {
            Ok(())
        }
    }

    #[test]
    fn iteration_preserves_registration_order() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(Arc::new(NamedAdapter(ProviderName::Jwt)))
            .expect("register jwt");
        registry
            .register(Arc::new(NamedAdapter(ProviderName::Firebase)))
            .expect("register firebase");
        registry
            .register(Arc::new(NamedAdapter(ProviderName::Supabase)))
            .expect("register supabase");

        let order: Vec<ProviderName> = registry.adapters().map(|a| a.name()).collect();
        assert_eq!(
            order,
            vec![
                ProviderName::Jwt,
                ProviderName::Firebase,
                ProviderName::Supabase
            ]
        );
    }

    #[test]
    fn lookup_by_name() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(Arc::new(NamedAdapter(ProviderName::Amplify)))
            .expect("register");

        assert!(registry.get(ProviderName::Amplify).is_some());
        assert!(registry.get(ProviderName::Jwt).is_none());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(Arc::new(NamedAdapter(ProviderName::Jwt)))
            .expect("first registration");

        let err = registry
            .register(Arc::new(NamedAdapter(ProviderName::Jwt)))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateProvider {
                provider: ProviderName::Jwt
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_registry_reports_empty() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
