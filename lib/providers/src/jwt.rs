//! Token-based authentication adapter.
//!
//! Wraps a locally stored JWT: on initialization the stored token is
//! decoded and its expiry checked, which settles the adapter without any
//! network round trip. Signature verification belongs to the issuing
//! backend and is not attempted here.

use crate::cell::AdapterCell;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use gatehouse_core::ProviderName;
use gatehouse_identity::{
    ChangeNotifier, ProviderAdapter, ProviderError, ProviderStatus, RoleSet, SourceUser,
    TokenError, UserPatch,
};
use rootcause::Report;
use serde::Deserialize;
use std::sync::RwLock;

/// Local storage for the authentication token.
///
/// The process-lifetime [`MemoryTokenStore`] is the default; persistent
/// stores (keychain, file) implement the same trait outside this crate.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    fn load(&self) -> Option<String>;

    /// Replaces the stored token.
    fn save(&self, token: &str);

    /// Removes the stored token.
    fn clear(&self);
}

/// In-memory token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with a token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    fn save(&self, token: &str) {
        *self.token.write().unwrap() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.write().unwrap() = None;
    }
}

/// Claims carried in the token payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Subject: the provider-issued user id.
    pub sub: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub picture: Option<String>,
    /// Role names.
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    /// Expiry as a unix timestamp.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Converts the claims into the adapter's source user shape.
    #[must_use]
    pub fn into_source_user(self) -> SourceUser {
        let mut user = SourceUser::new(self.sub);
        user.display_name = self.name;
        user.email = self.email;
        user.photo_url = self.picture;
        user.roles = self.roles.map(|names| RoleSet::from_names(&names));
        user
    }
}

/// Decodes the payload segment of a JWT and validates its expiry.
///
/// # Errors
///
/// Returns an error if the token is not three dot-separated segments, the
/// payload is not base64url-encoded JSON, or the `exp` claim is in the
/// past.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => {
            return Err(TokenError::Malformed {
                reason: "expected three dot-separated segments".to_string(),
            });
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| TokenError::InvalidPayload {
            reason: e.to_string(),
        })?;
    let claims: TokenClaims =
        serde_json::from_slice(&bytes).map_err(|e| TokenError::InvalidPayload {
            reason: e.to_string(),
        })?;

    if let Some(exp) = claims.exp
        && exp <= Utc::now().timestamp()
    {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

/// Adapter for token-based login.
pub struct JwtAdapter {
    cell: AdapterCell,
    store: Box<dyn TokenStore>,
}

impl JwtAdapter {
    /// Creates the adapter in the configuring state.
    #[must_use]
    pub fn new(store: Box<dyn TokenStore>, notifier: ChangeNotifier) -> Self {
        Self {
            cell: AdapterCell::new(ProviderName::Jwt, notifier),
            store,
        }
    }

    /// Validates the stored token and settles the adapter.
    ///
    /// An invalid or expired token is cleared from the store and the
    /// adapter settles to unauthenticated; it never stays configuring.
    pub fn initialize(&self) {
        match self.store.load() {
            Some(token) => match decode_claims(&token) {
                Ok(claims) => self.cell.settle_authenticated(claims.into_source_user()),
                Err(error) => {
                    tracing::debug!(%error, "stored token rejected");
                    self.store.clear();
                    self.cell.settle_unauthenticated();
                }
            },
            None => self.cell.settle_unauthenticated(),
        }
    }

    /// Accepts a freshly issued token, e.g. after an interactive login.
    ///
    /// An invalid token is rejected and the adapter state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns the decode error for the rejected token.
    pub fn accept_token(&self, token: &str) -> Result<(), TokenError> {
        let claims = decode_claims(token)?;
        self.store.save(token);
        self.cell.settle_authenticated(claims.into_source_user());
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for JwtAdapter {
    fn name(&self) -> ProviderName {
        self.cell.name()
    }

    fn status(&self) -> ProviderStatus {
        self.cell.status()
    }

    fn current_user(&self) -> Option<SourceUser> {
        self.cell.current_user()
    }

    async fn sign_out(&self) -> Result<(), Report<ProviderError>> {
        self.store.clear();
        self.cell.settle_unauthenticated();
        Ok(())
    }

    async fn update_user(&self, patch: UserPatch) -> Result<(), Report<ProviderError>> {
        let Some(mut user) = self.cell.current_user() else {
            tracing::debug!("profile update dropped: no token session");
            return Ok(());
        };

        user.apply_patch(patch);
        self.cell.settle_authenticated(user);
        Ok(())
    }
}
