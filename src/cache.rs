use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

use crate::models::{Schedule, ScheduleRequest};

/// LRU of decoded schedules, keyed by the request's canonical JSON.
///
/// Only finished schedules go in; failed solves are never stored.
pub struct ScheduleCache {
    inner: Option<Mutex<LruCache<String, Schedule>>>,
}

impl ScheduleCache {
    /// A capacity of 0 gives a cache that stores nothing.
    pub fn new(capacity: usize) -> Self {
        ScheduleCache {
            inner: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    pub fn key(req: &ScheduleRequest) -> Option<String> {
        serde_json::to_string(req).ok()
    }

    pub fn get(&self, key: &str) -> Option<Schedule> {
        self.inner.as_ref()?.lock().get(key).cloned()
    }

    pub fn put(&self, key: String, schedule: Schedule) {
        if let Some(inner) = &self.inner {
            inner.lock().put(key, schedule);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.lock().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
