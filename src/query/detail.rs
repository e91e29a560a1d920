//! Single-entity query with the same subscribe/refetch contract as the
//! paginated lists. Detail pages hold one of these per entity; a fetch error
//! is surfaced so the host can route to the internal-error view.

use std::sync::{Arc, Weak};

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{AppError, AppResult};

use super::cache::{CacheObserver, QueryCache, SubscriptionId};

pub type DetailFetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, AppResult<T>> + Send + Sync>;

struct DetailState<T> {
    value: Option<T>,
    error: Option<AppError>,
    fetching: bool,
    epoch: u64,
}

pub struct DetailInner<T> {
    fetcher: DetailFetcher<T>,
    state: Mutex<DetailState<T>>,
    self_weak: Weak<DetailInner<T>>,
}

pub struct DetailQuery<T> {
    inner: Arc<DetailInner<T>>,
}

impl<T> Clone for DetailQuery<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: Clone + Send + 'static> DetailQuery<T> {
    pub fn new(fetcher: DetailFetcher<T>) -> Self {
        let inner = Arc::new_cyclic(|self_weak| DetailInner {
            fetcher,
            state: Mutex::new(DetailState { value: None, error: None, fetching: false, epoch: 0 }),
            self_weak: self_weak.clone(),
        });
        Self { inner }
    }

    /// Fetch (or refetch) the entity. Re-entrant calls while one is pending
    /// are ignored.
    pub async fn load(&self) -> AppResult<bool> {
        self.inner.load().await
    }

    pub fn value(&self) -> Option<T> {
        self.inner.state.lock().value.clone()
    }

    pub fn error(&self) -> Option<AppError> {
        self.inner.state.lock().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().fetching
    }

    pub fn subscribe_to(&self, cache: &QueryCache, key: &str) -> SubscriptionId {
        let observer: Arc<dyn CacheObserver> = self.inner.clone();
        cache.subscribe(key, Arc::downgrade(&observer))
    }
}

impl<T: Clone + Send + 'static> DetailInner<T> {
    async fn load(&self) -> AppResult<bool> {
        let epoch = {
            let mut state = self.state.lock();
            if state.fetching {
                return Ok(false);
            }
            state.fetching = true;
            state.epoch += 1;
            state.epoch
        };
        let result = (self.fetcher)().await;
        let mut state = self.state.lock();
        if state.epoch != epoch {
            return Ok(false);
        }
        state.fetching = false;
        match result {
            Ok(value) => {
                state.value = Some(value);
                state.error = None;
                Ok(true)
            }
            Err(e) => {
                state.error = Some(e.clone());
                Err(e)
            }
        }
    }
}

impl<T: Clone + Send + 'static> CacheObserver for DetailInner<T> {
    fn on_invalidate(&self, key: &str) {
        debug!(target: "pawhaven", "detail under {} invalidated, scheduling refetch", key);
        let Some(strong) = self.self_weak.upgrade() else { return };
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _ = strong.load().await;
            });
        }
    }
}
