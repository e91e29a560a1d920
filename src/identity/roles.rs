use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Deserialize;

use crate::error::AppResult;
use crate::http::RestClient;
use crate::query::CacheObserver;

#[derive(Deserialize)]
struct AdminFlag {
    #[serde(default)]
    admin: bool,
}

/// Derives whether a principal has elevated privileges by asking the backend,
/// caching per email. Route guards read the cached answer synchronously; the
/// cache entry is dropped when the users collection is invalidated so a role
/// elevation becomes visible.
pub struct RoleResolver {
    backend: RestClient,
    cache: RwLock<HashMap<String, bool>>,
}

impl RoleResolver {
    pub fn new(backend: RestClient) -> Self {
        Self { backend, cache: RwLock::new(HashMap::new()) }
    }

    /// Cached answer, if the backend has been asked already.
    pub fn cached_is_admin(&self, email: &str) -> Option<bool> {
        self.cache.read().get(email).copied()
    }

    /// Ask the backend (or return the cached answer).
    pub async fn resolve_is_admin(&self, email: &str) -> AppResult<bool> {
        if let Some(known) = self.cached_is_admin(email) {
            return Ok(known);
        }
        let flag: AdminFlag = self
            .backend
            .get_json(&format!("/users/admin/{}", urlencoding::encode(email)))
            .await?;
        self.cache.write().insert(email.to_string(), flag.admin);
        Ok(flag.admin)
    }

    /// Drop all cached answers; the next guard evaluation re-queries.
    pub fn clear(&self) {
        self.cache.write().clear();
    }
}

/// Subscribed under the "users" cache key: a users mutation (role elevation
/// included) drops the cached answers so the next gate re-queries.
impl CacheObserver for RoleResolver {
    fn on_invalidate(&self, _key: &str) {
        self.clear();
    }
}
