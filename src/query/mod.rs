//! Incremental list loading and mutation synchronization.
//! Every catalog and dashboard table goes through this module: lists load one
//! page at a time through `PagedList`, mutations run through
//! `MutationController`, and the two meet in `QueryCache`, whose
//! invalidate-then-refetch protocol is the only write path to cached views.

pub mod cache;
pub mod detail;
pub mod mutation;
pub mod pager;

pub use cache::{CacheObserver, QueryCache, SubscriptionId};
pub use detail::DetailQuery;
pub use mutation::{MutationController, MutationOutcome};
pub use pager::{ListParams, LoadOutcome, PageData, PageFetcher, PageRequest, PagedList, SortOrder};
