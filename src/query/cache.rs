//! Key-based invalidation bus.
//! Queries subscribe under a `/`-separated key whose first segment names the
//! collection ("pets", "pets/user/a@b.c", "donations/42"). Invalidating a
//! collection notifies every active subscriber under it; subscribers mark
//! themselves stale and eagerly refetch. There is no other write path into a
//! cached view, which keeps cache and server truth from diverging.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

pub type SubscriptionId = u64;

/// Implemented by anything that holds fetched data keyed in the cache.
/// `on_invalidate` must be cheap; implementations schedule their refetch
/// rather than performing it inline.
pub trait CacheObserver: Send + Sync {
    fn on_invalidate(&self, key: &str);
}

struct SubEntry {
    id: SubscriptionId,
    key: String,
    observer: Weak<dyn CacheObserver>,
}

struct CacheInner {
    next_id: SubscriptionId,
    subs: Vec<SubEntry>,
}

/// Shared handle to the invalidation bus. Cloning is cheap; all clones see
/// the same subscribers.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Mutex<CacheInner>>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// A key depends on a target when it equals the target or lives under it
/// ("pets/42" depends on "pets"; "petstore" does not).
fn key_depends_on(key: &str, target: &str) -> bool {
    key == target
        || (key.len() > target.len()
            && key.starts_with(target)
            && key.as_bytes()[target.len()] == b'/')
}

impl QueryCache {
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(CacheInner { next_id: 1, subs: Vec::new() })) }
    }

    /// Register an observer under a key. Dropped observers are pruned lazily
    /// on the next invalidation touching them.
    pub fn subscribe(&self, key: &str, observer: Weak<dyn CacheObserver>) -> SubscriptionId {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subs.push(SubEntry { id, key: key.to_string(), observer });
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.lock().subs.retain(|s| s.id != id);
    }

    /// Mark every query under `target` stale and trigger its refetch.
    /// Returns the number of live subscribers notified.
    pub fn invalidate(&self, target: &str) -> usize {
        // Collect matches under the lock, notify outside it: an observer may
        // re-enter the cache (subscribe/unsubscribe) from on_invalidate.
        let matched: Vec<(String, Arc<dyn CacheObserver>)> = {
            let mut inner = self.inner.lock();
            inner.subs.retain(|s| s.observer.strong_count() > 0);
            inner
                .subs
                .iter()
                .filter(|s| key_depends_on(&s.key, target))
                .filter_map(|s| s.observer.upgrade().map(|o| (s.key.clone(), o)))
                .collect()
        };
        debug!(target: "pawhaven", "invalidate {} -> {} subscriber(s)", target, matched.len());
        for (key, observer) in &matched {
            observer.on_invalidate(key);
        }
        matched.len()
    }

    /// Invalidate several collections at once (a mutation's dependency list).
    pub fn invalidate_all(&self, targets: &[&str]) {
        for t in targets {
            self.invalidate(t);
        }
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.inner.lock().subs.len()
    }
}
