use std::sync::Arc;

use base64::Engine;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::http::{RestClient, TokenSlot};
use crate::prefs::{PrefsStore, StoredSession};
use crate::tprintln;

use super::principal::Principal;
use super::provider::{IdentityProvider, ProviderUser, SocialProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Bootstrap in progress; guards must render a placeholder, not redirect.
    Restoring,
    SignedOut,
    SignedIn { principal: Principal },
}

/// Tracks the current signed-in principal and owns the process-wide session
/// token. All writes to the token slot go through this store so sign-out can
/// clear it atomically before any further protected call.
pub struct SessionStore {
    state: RwLock<SessionState>,
    token: TokenSlot,
    prefs: PrefsStore,
    backend: RestClient,
    provider: Arc<dyn IdentityProvider>,
}

#[derive(Deserialize)]
struct JwtResponse {
    token: String,
}

/// Best-effort expiry peek at the JWT payload. A token we cannot parse is
/// treated as non-expiring; the backend remains the authority.
fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .ok()?;
    let v: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(v.get("exp")?.as_i64()?, 0)
}

impl SessionStore {
    pub fn new(
        backend: RestClient,
        token: TokenSlot,
        prefs: PrefsStore,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            state: RwLock::new(SessionState::Restoring),
            token,
            prefs,
            backend,
            provider,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn principal(&self) -> Option<Principal> {
        match &*self.state.read() {
            SessionState::SignedIn { principal } => Some(principal.clone()),
            _ => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(&*self.state.read(), SessionState::SignedIn { .. })
    }

    /// Bootstrap from durable storage: restore the persisted token and
    /// principal snapshot, unless the token has visibly expired.
    pub fn restore(&self) {
        match self.prefs.load_session() {
            Some(stored) => {
                if let Some(exp) = token_expiry(&stored.token) {
                    if exp <= Utc::now() {
                        debug!(target: "pawhaven", "stored session expired at {}", exp);
                        self.prefs.clear_session();
                        *self.token.write() = None;
                        *self.state.write() = SessionState::SignedOut;
                        return;
                    }
                }
                *self.token.write() = Some(stored.token.clone());
                *self.state.write() = SessionState::SignedIn { principal: stored.principal };
                tprintln!("session.restore ok");
            }
            None => {
                *self.token.write() = None;
                *self.state.write() = SessionState::SignedOut;
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Principal> {
        let user = self.provider.sign_in(email, password).await?;
        self.complete_sign_in(user).await
    }

    pub async fn sign_up(
        &self,
        name: &str,
        photo: Option<&str>,
        email: &str,
        password: &str,
    ) -> AppResult<Principal> {
        let mut user = self.provider.sign_up(email, password).await?;
        // Push the display fields chosen at registration to the provider
        self.provider.update_profile(name, photo).await?;
        user.display_name = Some(name.to_string());
        user.photo_url = photo.map(str::to_string);
        self.complete_sign_in(user).await
    }

    pub async fn sign_in_social(&self, social: SocialProvider) -> AppResult<Principal> {
        let user = self.provider.sign_in_social(social).await?;
        self.complete_sign_in(user).await
    }

    /// Exchange the authenticated email for a backend session token, register
    /// the profile on first login, persist and publish the session.
    async fn complete_sign_in(&self, user: ProviderUser) -> AppResult<Principal> {
        let jwt: JwtResponse = self
            .backend
            .post_json("/jwt", &serde_json::json!({ "email": user.email }))
            .await?;
        *self.token.write() = Some(jwt.token.clone());

        let principal = Principal {
            email: user.email.clone(),
            name: user.display_name.clone().unwrap_or_default(),
            photo: user.photo_url.clone(),
            phone: None,
            address: None,
        };

        // First-login registration; an already-registered profile is fine.
        let upsert = self
            .backend
            .post_json::<serde_json::Value, _>(
                "/users",
                &serde_json::json!({
                    "name": principal.name,
                    "email": principal.email,
                    "image": principal.photo,
                    "role": "user",
                }),
            )
            .await;
        if let Err(e) = upsert {
            match e {
                AppError::Validation { .. } => {
                    debug!(target: "pawhaven", "profile already registered: {}", e)
                }
                other => {
                    // Roll the half-open session back before surfacing
                    *self.token.write() = None;
                    return Err(other);
                }
            }
        }

        self.prefs.save_session(&StoredSession {
            token: jwt.token,
            principal: principal.clone(),
        })?;
        *self.state.write() = SessionState::SignedIn { principal: principal.clone() };
        tprintln!("session.sign_in email={}", principal.email);
        Ok(principal)
    }

    /// Clear the token slot and the durable copy first, then notify the
    /// provider. No protected request issued after this call can carry a
    /// stale token.
    pub async fn sign_out(&self) -> AppResult<()> {
        *self.token.write() = None;
        self.prefs.clear_session();
        *self.state.write() = SessionState::SignedOut;
        tprintln!("session.sign_out");
        self.provider.sign_out().await
    }

    /// Update display fields at the provider and the extended profile at the
    /// backend, then refresh the published principal.
    pub async fn update_profile(
        &self,
        name: &str,
        photo: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> AppResult<Principal> {
        let current = self
            .principal()
            .ok_or_else(|| AppError::auth("no_session", "not signed in"))?;

        self.provider.update_profile(name, photo).await?;
        let body = serde_json::json!({
            "name": name,
            "email": current.email,
            "image": photo,
            "role": "user",
            "phone": phone,
            "address": address,
        });
        if let Err(e) = self.backend.post_json::<serde_json::Value, _>("/users", &body).await {
            if !matches!(e, AppError::Validation { .. }) {
                return Err(e);
            }
        }

        let updated = Principal {
            email: current.email,
            name: name.to_string(),
            photo: photo.map(str::to_string),
            phone: phone.map(str::to_string),
            address: address.map(str::to_string),
        };
        if let Some(token) = self.token.read().clone() {
            self.prefs.save_session(&StoredSession { token, principal: updated.clone() })?;
        }
        *self.state.write() = SessionState::SignedIn { principal: updated.clone() };
        Ok(updated)
    }
}
