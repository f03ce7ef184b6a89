//! Membership result cache.
//!
//! Keeps recent membership answers for a short window so render-path checks
//! do not hit storage on every call. The cache is an optimization only and is
//! never authoritative; every mutating operation invalidates the pair it
//! touched before returning.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Cached membership answer with expiration.
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    member: bool,
    cached_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// Concurrent TTL cache keyed by (community, user).
///
/// Handles are cheap clones sharing one map, so the membership and join
/// request services can invalidate each other's view.
#[derive(Debug, Clone)]
pub struct MembershipCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<(Uuid, Uuid), CacheEntry>>>,
}

impl MembershipCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get a cached answer. Expired entries are dropped on the way out.
    pub fn get(&self, community_id: Uuid, user_id: Uuid) -> Option<bool> {
        let mut entries = self.entries.lock().unwrap();
        let key = (community_id, user_id);
        match entries.get(&key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(&key);
                None
            }
            Some(entry) => Some(entry.member),
            None => None,
        }
    }

    /// Cache an answer for one pair.
    pub fn insert(&self, community_id: Uuid, user_id: Uuid, member: bool) {
        let entry = CacheEntry {
            member,
            cached_at: Instant::now(),
            ttl: self.ttl,
        };
        self.entries
            .lock()
            .unwrap()
            .insert((community_id, user_id), entry);
    }

    /// Drop the entry for one pair.
    pub fn invalidate(&self, community_id: Uuid, user_id: Uuid) {
        self.entries
            .lock()
            .unwrap()
            .remove(&(community_id, user_id));
    }

    /// Drop every entry. Used after bulk operations.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Number of cached entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
