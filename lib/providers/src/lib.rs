//! Identity provider adapters for gatehouse.
//!
//! One module per backend, each implementing the
//! [`ProviderAdapter`](gatehouse_identity::ProviderAdapter) contract:
//!
//! - `jwt`: token-based login against a locally stored JWT
//! - `amplify`: AWS Amplify hosted authentication
//! - `firebase`: Firebase hosted authentication
//! - `supabase`: Supabase hosted authentication
//!
//! The adapters never talk to the network themselves; the hosted ones
//! consume the [`SessionBackend`]/[`AttributeSource`] seams, behind which
//! the real SDK integrations live.

pub mod amplify;
pub mod backend;
mod cell;
pub mod firebase;
pub mod jwt;
pub mod supabase;

// Re-export main types at crate root
pub use amplify::{AmplifyAdapter, AttributeSource, StaticAttributeSource};
pub use backend::{SessionBackend, StaticBackend};
pub use firebase::FirebaseAdapter;
pub use jwt::{JwtAdapter, MemoryTokenStore, TokenClaims, TokenStore, decode_claims};
pub use supabase::{AuthStateEvent, SupabaseAdapter};
