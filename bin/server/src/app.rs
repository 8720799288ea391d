//! Application wiring.
//!
//! Builds the adapter registry from configuration, spawns the reconciler,
//! kicks off every adapter's initial backend check, and exposes the shared
//! state the HTTP layer consumes.

use crate::config::{HostedProviderConfig, ProvidersConfig};
use gatehouse_core::ProviderName;
use gatehouse_identity::{ProviderAdapter, SessionContext, SourceUser, change_channel};
use gatehouse_providers::{
    AmplifyAdapter, FirebaseAdapter, JwtAdapter, MemoryTokenStore, StaticAttributeSource,
    StaticBackend, SupabaseAdapter,
};
use gatehouse_reconcile::{AuthFacade, LoadingGate, ProviderRegistry, Reconciler, ReconcilerHandle};
use std::sync::Arc;

/// Shared state for request handlers.
pub struct AppState {
    /// Routing surface for sign-out and profile updates.
    pub facade: AuthFacade,
    /// The process-wide session cell (read-only for handlers).
    pub session: Arc<SessionContext>,
    /// Observer of the loading gate.
    pub gate: LoadingGate,
}

/// A fully wired application.
pub struct App {
    /// State handed to the router.
    pub state: Arc<AppState>,
    /// Handle for stopping the reconciler at shutdown.
    pub reconciler: ReconcilerHandle,
}

/// Builds the application from provider configuration.
///
/// Registration order is the provider priority order: jwt, amplify,
/// firebase, supabase. Disabled providers are not registered and therefore
/// never hold the gate open.
pub fn build(providers: &ProvidersConfig) -> App {
    let (notifier, changes) = change_channel();
    let mut registry = ProviderRegistry::new();

    let jwt = providers.jwt.enabled.then(|| {
        let store = match &providers.jwt.token {
            Some(token) => MemoryTokenStore::with_token(token.clone()),
            None => MemoryTokenStore::new(),
        };
        Arc::new(JwtAdapter::new(Box::new(store), notifier.clone()))
    });
    let amplify = providers.amplify.enabled.then(|| {
        let source = match static_user(&providers.amplify) {
            Some(user) => StaticAttributeSource::with_user(user),
            None => StaticAttributeSource::failing(),
        };
        Arc::new(AmplifyAdapter::new(Arc::new(source), notifier.clone()))
    });
    let firebase = providers.firebase.enabled.then(|| {
        Arc::new(FirebaseAdapter::new(
            Arc::new(hosted_backend(ProviderName::Firebase, &providers.firebase)),
            notifier.clone(),
        ))
    });
    let supabase = providers.supabase.enabled.then(|| {
        Arc::new(SupabaseAdapter::new(
            Arc::new(hosted_backend(ProviderName::Supabase, &providers.supabase)),
            notifier.clone(),
        ))
    });

    for adapter in [
        jwt.clone().map(|a| a as Arc<dyn ProviderAdapter>),
        amplify.clone().map(|a| a as Arc<dyn ProviderAdapter>),
        firebase.clone().map(|a| a as Arc<dyn ProviderAdapter>),
        supabase.clone().map(|a| a as Arc<dyn ProviderAdapter>),
    ]
    .into_iter()
    .flatten()
    {
        registry
            .register(adapter)
            .expect("each provider is constructed at most once");
    }

    let registry = Arc::new(registry);
    let session = Arc::new(SessionContext::new());
    let (reconciler, gate, handle) =
        Reconciler::new(registry.clone(), session.clone(), changes);
    let facade = AuthFacade::new(registry, session.clone());
    tokio::spawn(reconciler.run());

    // Initial backend checks. The token check is local and synchronous; the
    // hosted checks run concurrently and settle their adapters as they
    // complete.
    if let Some(jwt) = jwt {
        jwt.initialize();
    }
    let amplify_signed_in = static_user(&providers.amplify).map(|user| user.uid);
    if let Some(amplify) = amplify {
        tokio::spawn(async move {
            amplify.initialize(amplify_signed_in.as_deref()).await;
        });
    }
    if let Some(firebase) = firebase {
        tokio::spawn(async move { firebase.initialize().await });
    }
    if let Some(supabase) = supabase {
        tokio::spawn(async move { supabase.initialize().await });
    }

    App {
        state: Arc::new(AppState {
            facade,
            session,
            gate,
        }),
        reconciler: handle,
    }
}

/// Builds the in-process backend for a hosted provider's configuration.
fn hosted_backend(provider: ProviderName, config: &HostedProviderConfig) -> StaticBackend {
    match static_user(config) {
        Some(user) => StaticBackend::signed_in(provider, user),
        None => StaticBackend::signed_out(provider),
    }
}

/// The fixed session user configured for a hosted provider, if any.
fn static_user(config: &HostedProviderConfig) -> Option<SourceUser> {
    config.session_uid.as_ref().map(|uid| {
        let mut user = SourceUser::new(uid.clone());
        user.email = config.session_email.clone();
        user
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvidersConfig;
    use std::time::Duration;

    #[tokio::test]
    async fn default_config_settles_signed_out() {
        let app = build(&ProvidersConfig::default());
        let mut gate = app.state.gate.clone();

        tokio::time::timeout(Duration::from_secs(1), gate.wait_closed())
            .await
            .expect("gate closes");

        assert!(!app.state.session.is_authenticated());
        app.reconciler.shutdown();
    }

    #[tokio::test]
    async fn configured_hosted_session_signs_in() {
        let mut providers = ProvidersConfig::default();
        providers.supabase.enabled = true;
        providers.supabase.session_uid = Some("s1".to_string());
        providers.supabase.session_email = Some("a@b.com".to_string());

        let app = build(&providers);
        let mut gate = app.state.gate.clone();
        tokio::time::timeout(Duration::from_secs(1), gate.wait_closed())
            .await
            .expect("gate closes");

        let snapshot = app.state.session.get();
        assert_eq!(snapshot.active_provider(), Some(ProviderName::Supabase));
        assert_eq!(
            snapshot.user().map(|u| u.email().to_string()),
            Some("a@b.com".to_string())
        );
        app.reconciler.shutdown();
    }

    #[tokio::test]
    async fn sign_out_round_trip_clears_session() {
        let mut providers = ProvidersConfig::default();
        providers.jwt.enabled = false;
        providers.firebase.enabled = true;
        providers.firebase.session_uid = Some("f1".to_string());

        let app = build(&providers);
        let mut gate = app.state.gate.clone();
        tokio::time::timeout(Duration::from_secs(1), gate.wait_closed())
            .await
            .expect("gate closes");
        assert!(app.state.session.is_authenticated());

        app.state.facade.sign_out().await;

        // The adapter's state change flows back through the reconciler.
        let mut cleared = false;
        for _ in 0..50 {
            if !app.state.session.is_authenticated() {
                cleared = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(cleared, "session clears after sign-out settles");
        app.reconciler.shutdown();
    }
}
