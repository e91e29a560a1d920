//! Mutation-then-invalidate controller.
//! Performs one remote create/update/delete and, on success, invalidates the
//! dependent collections so every active view refetches. Each user-initiated
//! action key runs at most once concurrently (the triggering control is
//! ignored while pending); unrelated actions may overlap.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::AppResult;
use crate::notify::Notifier;

use super::cache::QueryCache;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<T> {
    Completed(T),
    /// The same action was already pending; nothing was sent.
    Ignored,
}

pub struct MutationController {
    cache: QueryCache,
    notifier: Arc<Notifier>,
    in_flight: Mutex<HashSet<String>>,
}

impl MutationController {
    pub fn new(cache: QueryCache, notifier: Arc<Notifier>) -> Self {
        Self { cache, notifier, in_flight: Mutex::new(HashSet::new()) }
    }

    /// Run a mutation under an action key. On success every collection in
    /// `invalidates` is invalidated; on failure the error is surfaced as a
    /// notice and nothing is invalidated — the user must re-trigger.
    pub async fn run<T, F>(
        &self,
        action: &str,
        invalidates: &[&str],
        fut: F,
    ) -> AppResult<MutationOutcome<T>>
    where
        F: Future<Output = AppResult<T>>,
    {
        {
            let mut pending = self.in_flight.lock();
            if !pending.insert(action.to_string()) {
                debug!(target: "pawhaven", "mutation {} already pending, ignored", action);
                return Ok(MutationOutcome::Ignored);
            }
        }

        let result = fut.await;
        self.in_flight.lock().remove(action);

        match result {
            Ok(value) => {
                self.cache.invalidate_all(invalidates);
                Ok(MutationOutcome::Completed(value))
            }
            Err(e) => {
                self.notifier.push(e.notice_level(), e.message().to_string());
                Err(e)
            }
        }
    }

    /// Whether an action key is currently pending; hosts use this to disable
    /// the triggering control.
    pub fn is_pending(&self, action: &str) -> bool {
        self.in_flight.lock().contains(action)
    }
}
