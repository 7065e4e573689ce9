//! Single-slot, time-bounded cache for the parsed manifest.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::index::ManifestIndex;

struct Slot {
    manifest_url: String,
    built_at: DateTime<Utc>,
    index: Arc<ManifestIndex>,
}

/// Holds at most one parsed manifest, keyed by its URL.
///
/// Entries are replaced whole by [`put`](Self::put); a reader sees either
/// the previous index or the new one, never a partial build. Time is passed
/// in by the caller so tests can drive expiry.
pub struct ManifestCache {
    ttl: Duration,
    slot: Mutex<Option<Slot>>,
}

impl ManifestCache {
    /// Creates an empty cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slot: Mutex::new(None) }
    }

    /// Configured entry lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached index for `manifest_url`, if present and not older than the TTL.
    ///
    /// An entry stamped in the future (clock moved backwards) counts as expired.
    #[must_use]
    pub fn get(&self, manifest_url: &str, now: DateTime<Utc>) -> Option<Arc<ManifestIndex>> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slot.as_ref().filter(|s| s.manifest_url == manifest_url)?;
        let age = now.signed_duration_since(slot.built_at).to_std().ok()?;
        (age <= self.ttl).then(|| Arc::clone(&slot.index))
    }

    /// Replaces the cached entry and returns a handle to the stored index.
    pub fn put(
        &self,
        manifest_url: &str,
        index: ManifestIndex,
        now: DateTime<Utc>,
    ) -> Arc<ManifestIndex> {
        let index = Arc::new(index);
        let fresh =
            Slot { manifest_url: manifest_url.to_string(), built_at: now, index: Arc::clone(&index) };
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(fresh);
        index
    }

    /// Drops the cached entry.
    pub fn invalidate(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
    }

    fn sample() -> ManifestIndex {
        let mut index = ManifestIndex::default();
        index.insert("Content/a.htm", "A", "htm");
        index
    }

    #[test]
    fn serves_until_ttl_then_expires() {
        let cache = ManifestCache::new(Duration::from_secs(600));
        cache.put("https://h/Data/Alias.xml", sample(), start());

        let at_ttl = start() + TimeDelta::seconds(600);
        assert!(cache.get("https://h/Data/Alias.xml", at_ttl).is_some());

        let past_ttl = at_ttl + TimeDelta::seconds(1);
        assert!(cache.get("https://h/Data/Alias.xml", past_ttl).is_none());
    }

    #[test]
    fn other_manifest_url_misses() {
        let cache = ManifestCache::new(Duration::from_secs(600));
        cache.put("https://h/A/Data/Alias.xml", sample(), start());
        assert!(cache.get("https://h/B/Data/Alias.xml", start()).is_none());
    }

    #[test]
    fn clock_going_backwards_expires() {
        let cache = ManifestCache::new(Duration::from_secs(600));
        cache.put("u", sample(), start());
        assert!(cache.get("u", start() - TimeDelta::seconds(5)).is_none());
    }

    #[test]
    fn put_replaces_and_invalidate_clears() {
        let cache = ManifestCache::new(Duration::from_secs(600));
        let first = cache.put("u", sample(), start());
        let second = cache.put("u", ManifestIndex::default(), start());

        let current = cache.get("u", start()).unwrap();
        assert!(Arc::ptr_eq(&current, &second));
        assert!(!Arc::ptr_eq(&current, &first));
        // A reader holding the old index keeps a complete copy.
        assert_eq!(first.len(), 1);

        cache.invalidate();
        assert!(cache.get("u", start()).is_none());
    }
}
