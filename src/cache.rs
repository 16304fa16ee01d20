//! Response cache for the series API client.
//!
//! An explicit object with an injected TTL rather than module-level state,
//! so call sites own their cache lifetime and the layout engine stays pure.
//! Inflight keys are tracked separately so concurrent fetches of the same
//! resource can be deduplicated by the caller.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(20);

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

pub struct ResponseCache<V> {
    ttl: Duration,
    entries: HashMap<String, CacheEntry<V>>,
    inflight: HashSet<String>,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            inflight: HashSet::new(),
        }
    }

    /// Fetch a cached response. Expired entries are evicted on read.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.expires_at <= Instant::now(),
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn insert(&mut self, key: &str, value: V) {
        self.insert_with_ttl(key, value, self.ttl);
    }

    pub fn insert_with_ttl(&mut self, key: &str, value: V, ttl: Duration) {
        self.entries.insert(
            key.to_owned(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Mark a key as having a fetch in flight. Returns false when another
    /// fetch already claimed it, in which case the caller should wait for
    /// that one instead of issuing its own.
    pub fn begin_inflight(&mut self, key: &str) -> bool {
        self.inflight.insert(key.to_owned())
    }

    pub fn finish_inflight(&mut self, key: &str) {
        self.inflight.remove(key);
    }

    pub fn is_inflight(&self, key: &str) -> bool {
        self.inflight.contains(key)
    }

    /// Drop every cached response and inflight marker.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.inflight.clear();
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

/// Build a stable cache key for a GET request: parameters with empty values
/// are dropped, the rest are sorted by name so argument order never changes
/// the key.
pub fn cache_key(url: &str, params: &[(&str, &str)]) -> String {
    let mut kept: Vec<(&str, &str)> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .copied()
        .collect();
    kept.sort_by(|a, b| a.0.cmp(b.0));

    if kept.is_empty() {
        return url.to_owned();
    }

    let serialized: Vec<String> = kept
        .iter()
        .map(|(key, value)| format!("{}={}", escape_component(key), escape_component(value)))
        .collect();
    format!("{url}?{}", serialized.join("&"))
}

/// Escape the characters that would make a key ambiguous.
fn escape_component(component: &str) -> String {
    let mut escaped = String::with_capacity(component.len());
    for ch in component.chars() {
        match ch {
            '%' | '&' | '=' | '?' | '#' => {
                escaped.push('%');
                escaped.push_str(&format!("{:02X}", ch as u32));
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Only series listing/detail GETs are worth caching.
pub fn should_cache_request(method: &str, path: &str) -> bool {
    if !method.eq_ignore_ascii_case("get") {
        return false;
    }
    match path.strip_prefix("/series") {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('/')
            .is_some_and(|id| !id.is_empty() && id.bytes().all(|byte| byte.is_ascii_digit())),
        None => false,
    }
}

/// Any mutation under `/series` invalidates the whole series cache.
pub fn should_invalidate_series_cache(method: &str, path: &str) -> bool {
    let method = method.to_ascii_lowercase();
    if !matches!(method.as_str(), "post" | "patch" | "put" | "delete") {
        return false;
    }
    path == "/series" || path.starts_with("/series/")
}
