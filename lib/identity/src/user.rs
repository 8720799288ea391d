//! User records: provider-native source data and the normalized unified user.
//!
//! Adapters report [`SourceUser`] values in whatever completeness their
//! backend offers. Sign-in normalizes a source into a [`UnifiedUser`] in one
//! step, so a unified record is never observable with unresolved fields.

use crate::role::RoleSet;
use serde::{Deserialize, Serialize};

/// Display name used when a provider supplies neither a name nor an email.
const FALLBACK_DISPLAY_NAME: &str = "User";

/// User data as reported by a single provider, before normalization.
///
/// Only the provider-issued subject id is mandatory; everything else is
/// whatever the backend happened to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUser {
    /// Provider-issued unique identifier for the user.
    pub uid: String,
    /// Display name, if the provider supplies one.
    pub display_name: Option<String>,
    /// Email address, if the provider supplies one.
    pub email: Option<String>,
    /// Avatar URL, if the provider supplies one.
    pub photo_url: Option<String>,
    /// Provider-supplied roles; absent means the platform default applies.
    pub roles: Option<RoleSet>,
}

impl SourceUser {
    /// Creates a source user with only the subject id set.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
            photo_url: None,
            roles: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the avatar URL.
    #[must_use]
    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }

    /// Sets provider-supplied roles.
    #[must_use]
    pub fn with_roles(mut self, roles: RoleSet) -> Self {
        self.roles = Some(roles);
        self
    }

    /// Applies a profile patch in place.
    ///
    /// Unset patch fields keep their current values. Used by adapters that
    /// apply updates locally before republishing their user.
    pub fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(display_name) = patch.display_name {
            self.display_name = Some(display_name);
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(photo_url) = patch.photo_url {
            self.photo_url = Some(photo_url);
        }
        if let Some(roles) = patch.roles {
            self.roles = Some(roles);
        }
    }
}

/// The normalized, provider-agnostic user record.
///
/// Immutable value object: construction resolves every field, and updates
/// produce a new instance via [`UnifiedUser::with_patch`] rather than
/// mutating in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedUser {
    /// Provider-issued unique identifier.
    id: String,
    /// Resolved display name (never empty).
    display_name: String,
    /// Email address; empty string when the provider supplied none.
    email: String,
    /// Avatar URL; empty string when the provider supplied none.
    #[serde(rename = "photoURL")]
    photo_url: String,
    /// Resolved roles.
    roles: RoleSet,
}

impl UnifiedUser {
    /// Normalizes a provider-native user into the unified shape.
    ///
    /// Field resolution:
    /// - display name falls back to the email local part, then to a fixed
    ///   placeholder;
    /// - missing email and photo URL become empty strings;
    /// - missing roles become the platform default set.
    #[must_use]
    pub fn from_source(source: SourceUser) -> Self {
        let email = source.email.unwrap_or_default();
        let display_name = source
            .display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| derive_display_name(&email));

        Self {
            id: source.uid,
            display_name,
            email,
            photo_url: source.photo_url.unwrap_or_default(),
            roles: source.roles.unwrap_or_else(RoleSet::admin),
        }
    }

    /// Returns a new user with the patch applied.
    ///
    /// Unset patch fields keep their current values. The receiver is left
    /// untouched.
    #[must_use]
    pub fn with_patch(&self, patch: &UserPatch) -> Self {
        Self {
            id: self.id.clone(),
            display_name: patch
                .display_name
                .clone()
                .unwrap_or_else(|| self.display_name.clone()),
            email: patch.email.clone().unwrap_or_else(|| self.email.clone()),
            photo_url: patch
                .photo_url
                .clone()
                .unwrap_or_else(|| self.photo_url.clone()),
            roles: patch.roles.clone().unwrap_or_else(|| self.roles.clone()),
        }
    }

    /// Returns the provider-issued user id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the resolved display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the email address (possibly empty).
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the avatar URL (possibly empty).
    #[must_use]
    pub fn photo_url(&self) -> &str {
        &self.photo_url
    }

    /// Returns the user's roles.
    #[must_use]
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }
}

/// Derives a display name from an email address.
fn derive_display_name(email: &str) -> String {
    match email.split('@').next() {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => FALLBACK_DISPLAY_NAME.to_string(),
    }
}

/// A partial profile update routed to the active provider.
///
/// Unset fields are left unchanged by the receiving adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    /// New display name, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New email address, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New avatar URL, if changing.
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// New role set, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<RoleSet>,
}

impl UserPatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.email.is_none()
            && self.photo_url.is_none()
            && self.roles.is_none()
    }
}
