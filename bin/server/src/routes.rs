//! HTTP surface and the rendering gate.
//!
//! Protected content is reachable only through [`RequireSession`]: while
//! the loading gate is open every protected request gets the placeholder
//! response, and once reconciliation has settled an unauthenticated request
//! gets a 401. The session endpoint itself is never gated so shells can
//! poll it.

use crate::app::AppState;
use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use gatehouse_identity::{SessionSnapshot, UserPatch};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Extractor for requiring a resolved, authenticated session.
pub struct RequireSession(pub SessionSnapshot);

impl<S> FromRequestParts<S> for RequireSession
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);

        if app_state.gate.is_open() {
            return Err(GateRejection::StillLoading);
        }

        let snapshot = app_state.session.get();
        if !snapshot.is_authenticated() {
            return Err(GateRejection::NotAuthenticated);
        }

        Ok(RequireSession(snapshot))
    }
}

/// Rejection type for the session gate.
#[derive(Debug)]
pub enum GateRejection {
    /// Reconciliation has not reached a decision yet.
    StillLoading,
    /// Reconciliation settled without a signed-in user.
    NotAuthenticated,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            Self::StillLoading => (
                StatusCode::SERVICE_UNAVAILABLE,
                [("Retry-After", "1")],
                "Resolving session",
            )
                .into_response(),
            Self::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, "Not authenticated").into_response()
            }
        }
    }
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/session", get(session))
        .route("/auth/signout", post(sign_out))
        .route("/auth/user", patch(update_user))
        .route("/app", get(protected))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Returns the current session snapshot, authenticated or not.
async fn session(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(state.session.get())
}

/// Signs out of the active provider.
async fn sign_out(State(state): State<Arc<AppState>>) -> StatusCode {
    state.facade.sign_out().await;
    StatusCode::NO_CONTENT
}

/// Routes a profile update to the active provider.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<UserPatch>,
) -> StatusCode {
    state.facade.update_user(patch).await;
    StatusCode::NO_CONTENT
}

/// Protected content, rendered with the resolved session.
async fn protected(RequireSession(session): RequireSession) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "activeProvider": session.active_provider(),
        "user": session.user(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use gatehouse_identity::{SessionContext, SourceUser, UnifiedUser, change_channel};
    use gatehouse_reconcile::{AuthFacade, ProviderRegistry, Reconciler};
    use tower::ServiceExt;

    /// State whose gate is still open: a registry with one provider that
    /// never settles, reconciler not running.
    fn loading_state() -> Arc<AppState> {
        use async_trait::async_trait;
        use gatehouse_core::ProviderName;
        use gatehouse_identity::{ProviderAdapter, ProviderError, ProviderStatus};
        use rootcause::Report;

        struct StuckAdapter;

        #[async_trait]
        impl ProviderAdapter for StuckAdapter {
            fn name(&self) -> ProviderName {
                ProviderName::Firebase
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

        let (_notifier, changes) = change_channel();
        let mut registry = ProviderRegistry::new();
        registry
            .register(Arc::new(StuckAdapter))
            .expect("register stuck adapter");
        let registry = Arc::new(registry);
        let session = Arc::new(SessionContext::new());
        let (_reconciler, gate, _handle) =
            Reconciler::new(registry.clone(), session.clone(), changes);

        Arc::new(AppState {
            facade: AuthFacade::new(registry, session.clone()),
            session,
            gate,
        })
    }

    /// State whose gate has closed; optionally signed in first.
    async fn settled_state(signed_in: bool) -> Arc<AppState> {
        let (_notifier, changes) = change_channel();
        let registry = Arc::new(ProviderRegistry::new());
        let session = Arc::new(SessionContext::new());
        if signed_in {
            session.set(
                gatehouse_core::ProviderName::Jwt,
                UnifiedUser::from_source(SourceUser::new("u1").with_email("a@b.com")),
            );
        }
        let (reconciler, gate, _handle) =
            Reconciler::new(registry.clone(), session.clone(), changes);
        reconciler.evaluate().await;
        assert!(!gate.is_open());

        Arc::new(AppState {
            facade: AuthFacade::new(registry, session.clone()),
            session,
            gate,
        })
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request builds")
    }

    #[tokio::test]
    async fn protected_route_returns_503_while_loading() {
        let app = router(loading_state());
        let response = app
            .oneshot(request("GET", "/app"))
            .await
            .expect("request completes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.headers().get("Retry-After").map(|v| v.as_bytes()),
            Some(b"1".as_slice())
        );
    }

    #[tokio::test]
    async fn session_endpoint_is_never_gated() {
        let app = router(loading_state());
        let response = app
            .oneshot(request("GET", "/session"))
            .await
            .expect("request completes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_route_returns_401_when_settled_signed_out() {
        let app = router(settled_state(false).await);
        let response = app
            .oneshot(request("GET", "/app"))
            .await
            .expect("request completes");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_route_renders_resolved_session() {
        let app = router(settled_state(true).await);
        let response = app
            .oneshot(request("GET", "/app"))
            .await
            .expect("request completes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn sign_out_without_active_provider_is_a_no_op() {
        let app = router(settled_state(false).await);
        let response = app
            .oneshot(request("POST", "/auth/signout"))
            .await
            .expect("request completes");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn update_user_accepts_patch_body() {
        let app = router(settled_state(true).await);
        let request = Request::builder()
            .method("PATCH")
            .uri("/auth/user")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"displayName":"Alice"}"#))
            .expect("request builds");
        let response = app.oneshot(request).await.expect("request completes");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
