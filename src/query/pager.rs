//! Paginated list synchronizer.
//! Presents an unbounded, filterable, sortable collection as an
//! incrementally-loaded sequence. Pages are fetched on demand in increasing
//! index order and appended in server order; changing the filter discards
//! everything and restarts at page zero. A response that arrives for a
//! superseded filter epoch is discarded, never merged.

use std::sync::{Arc, Weak};

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{AppError, AppResult};

use super::cache::{CacheObserver, QueryCache, SubscriptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Active filter/sort parameters; everything except the page index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub search: String,
    pub category: String,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: String::new(),
            sort_by: "dateAdded".to_string(),
            sort_order: SortOrder::Desc,
        }
    }
}

/// One fetched page, as reported by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct PageData<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub params: ListParams,
}

pub type PageFetcher<T> =
    Arc<dyn Fn(PageRequest) -> BoxFuture<'static, AppResult<PageData<T>>> + Send + Sync>;

/// Result of a `load_next` call. `Ignored` covers every silent no-op case:
/// already fetching, exhausted, or terminal error state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Ignored,
}

struct PagerState<T> {
    params: ListParams,
    pages: Vec<PageData<T>>,
    /// Bumped on every filter change; responses carry the epoch they were
    /// issued under and are dropped on mismatch.
    epoch: u64,
    /// True while a fetch for the current epoch is in flight.
    fetching: bool,
    error: Option<AppError>,
}

pub struct PagerInner<T> {
    fetcher: PageFetcher<T>,
    state: Mutex<PagerState<T>>,
    self_weak: Weak<PagerInner<T>>,
}

/// Shared handle to one synchronized list instance.
pub struct PagedList<T> {
    inner: Arc<PagerInner<T>>,
}

impl<T> Clone for PagedList<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: Clone + Send + 'static> PagedList<T> {
    pub fn new(fetcher: PageFetcher<T>) -> Self {
        Self::with_params(fetcher, ListParams::default())
    }

    pub fn with_params(fetcher: PageFetcher<T>, params: ListParams) -> Self {
        let inner = Arc::new_cyclic(|self_weak| PagerInner {
            fetcher,
            state: Mutex::new(PagerState {
                params,
                pages: Vec::new(),
                epoch: 0,
                fetching: false,
                error: None,
            }),
            self_weak: self_weak.clone(),
        });
        Self { inner }
    }

    /// Fetch the next page, if any. No-op when a fetch is already in flight,
    /// when the list is exhausted, or after a terminal fetch error.
    pub async fn load_next(&self) -> AppResult<LoadOutcome> {
        self.inner.load_next().await
    }

    /// The intersection-visibility trigger: the sentinel near the list's end
    /// entered the viewport. A proximity heuristic, nothing more.
    pub async fn notify_sentinel_visible(&self) -> AppResult<LoadOutcome> {
        self.inner.load_next().await
    }

    /// Discard all fetched pages, switch to new parameters and refetch page
    /// zero. Stale in-flight responses from the previous filter are dropped
    /// on arrival.
    pub async fn change_filter(&self, params: ListParams) -> AppResult<LoadOutcome> {
        self.inner.reset_and_fetch(Some(params)).await
    }

    /// Same reset semantics as `change_filter` with unchanged parameters;
    /// the cache-invalidation entry point.
    pub async fn refresh(&self) -> AppResult<LoadOutcome> {
        self.inner.reset_and_fetch(None).await
    }

    /// Flattened view: concatenation of fetched pages in increasing index
    /// order, server order within each page.
    pub fn items(&self) -> Vec<T> {
        let state = self.inner.state.lock();
        state.pages.iter().flat_map(|p| p.items.iter().cloned()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().pages.iter().map(|p| p.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_more(&self) -> bool {
        let state = self.inner.state.lock();
        match state.pages.last() {
            None => true,
            Some(last) => last.current_page + 1 < last.total_pages,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().fetching
    }

    pub fn error(&self) -> Option<AppError> {
        self.inner.state.lock().error.clone()
    }

    pub fn params(&self) -> ListParams {
        self.inner.state.lock().params.clone()
    }

    /// Register this list under a cache key; invalidating the key schedules
    /// an eager refresh on the current runtime.
    pub fn subscribe_to(&self, cache: &QueryCache, key: &str) -> SubscriptionId {
        let observer: Arc<dyn CacheObserver> = self.inner.clone();
        cache.subscribe(key, Arc::downgrade(&observer))
    }
}

impl<T: Clone + Send + 'static> PagerInner<T> {
    async fn load_next(&self) -> AppResult<LoadOutcome> {
        let (epoch, request) = {
            let mut state = self.state.lock();
            if state.error.is_some() || state.fetching {
                return Ok(LoadOutcome::Ignored);
            }
            let next_page = match state.pages.last() {
                None => 0,
                Some(last) => {
                    if last.current_page + 1 >= last.total_pages {
                        return Ok(LoadOutcome::Ignored);
                    }
                    last.current_page + 1
                }
            };
            state.fetching = true;
            (state.epoch, PageRequest { page: next_page, params: state.params.clone() })
        };
        self.run_fetch(epoch, request).await
    }

    async fn reset_and_fetch(&self, params: Option<ListParams>) -> AppResult<LoadOutcome> {
        let (epoch, request) = {
            let mut state = self.state.lock();
            state.epoch += 1;
            if let Some(params) = params {
                state.params = params;
            }
            state.pages.clear();
            state.error = None;
            state.fetching = true;
            (state.epoch, PageRequest { page: 0, params: state.params.clone() })
        };
        self.run_fetch(epoch, request).await
    }

    async fn run_fetch(&self, epoch: u64, request: PageRequest) -> AppResult<LoadOutcome> {
        let page = request.page;
        let result = (self.fetcher)(request).await;
        let mut state = self.state.lock();
        if state.epoch != epoch {
            // Superseded by a filter change while in flight; the new epoch
            // owns the fetching flag now.
            debug!(target: "pawhaven", "dropping stale page {} (epoch {} != {})", page, epoch, state.epoch);
            return Ok(LoadOutcome::Ignored);
        }
        state.fetching = false;
        match result {
            Ok(data) => {
                let appended = data.items.len();
                state.pages.push(data);
                Ok(LoadOutcome::Loaded(appended))
            }
            Err(e) => {
                // Terminal for the whole list until the next filter change
                state.error = Some(e.clone());
                Err(e)
            }
        }
    }
}

impl<T: Clone + Send + 'static> CacheObserver for PagerInner<T> {
    fn on_invalidate(&self, key: &str) {
        debug!(target: "pawhaven", "list under {} invalidated, scheduling refresh", key);
        let Some(strong) = self.self_weak.upgrade() else { return };
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _ = strong.reset_and_fetch(None).await;
            });
        }
    }
}

#[cfg(test)]
#[path = "pager_tests.rs"]
mod pager_tests;
