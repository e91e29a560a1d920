//! Dismissible notifications surfaced to the host UI.
//! Every user-visible failure and success lands here; nothing is allowed to
//! reach the host as a blank screen. One-time notices are deduplicated by key
//! so a redirect re-entry does not repeat them.

use std::collections::HashSet;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Default)]
pub struct Notifier {
    pending: Mutex<Vec<Notice>>,
    seen_keys: Mutex<HashSet<String>>,
}

impl Notifier {
    pub fn new() -> Self { Self::default() }

    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice {
            id: Uuid::new_v4().to_string(),
            level,
            message: message.into(),
        };
        self.pending.lock().push(notice);
    }

    /// Push a notice at most once per key for the lifetime of this notifier.
    /// Returns true if the notice was actually queued.
    pub fn push_once(&self, key: &str, level: NoticeLevel, message: impl Into<String>) -> bool {
        let mut seen = self.seen_keys.lock();
        if !seen.insert(key.to_string()) {
            return false;
        }
        drop(seen);
        self.push(level, message);
        true
    }

    /// Take all pending notices; the host renders and dismisses them.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}
