//! Central identity, session and role management for the client engine.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod provider;
mod roles;
mod session;

pub use principal::Principal;
pub use provider::{HttpIdentityProvider, IdentityProvider, ProviderUser, SocialProvider};
pub use roles::RoleResolver;
pub use session::{SessionState, SessionStore};
