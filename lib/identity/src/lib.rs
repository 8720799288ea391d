//! Provider-agnostic identity domain for gatehouse.
//!
//! This crate provides:
//! - The provider adapter contract (`ProviderAdapter`, `ChangeNotifier`)
//! - Provider status reporting (`ProviderStatus`)
//! - User records (`SourceUser`, `UnifiedUser`, `UserPatch`)
//! - Role types (`Role`, `RoleSet`)
//! - The process-wide session cell (`SessionContext`, `SessionSnapshot`)
//!
//! # Session Model
//!
//! At most one provider is active at a time. Adapters observe their own
//! backends and report `{status, current_user}`; the reconciler (in
//! `gatehouse-reconcile`) merges those observations into the session cell.
//!
//! # Example
//!
//! ```
//! use gatehouse_core::ProviderName;
//! use gatehouse_identity::{SessionContext, SourceUser, UnifiedUser};
//!
//! // Normalize a provider-native user at sign-in
//! let source = SourceUser::new("f1").with_email("a@b.com");
//! let user = UnifiedUser::from_source(source);
//! assert_eq!(user.display_name(), "a");
//!
//! // Publish the resolved session
//! let session = SessionContext::new();
//! session.set(ProviderName::Firebase, user);
//! assert!(session.get().is_authenticated());
//! ```

pub mod adapter;
pub mod error;
pub mod role;
pub mod session;
pub mod status;
pub mod user;

// Re-export main types at crate root
pub use adapter::{ChangeNotifier, ChangeReceiver, ProviderAdapter, change_channel};
pub use error::{ProviderError, TokenError};
pub use role::{Role, RoleSet};
pub use session::{SessionContext, SessionSnapshot};
pub use status::ProviderStatus;
pub use user::{SourceUser, UnifiedUser, UserPatch};
