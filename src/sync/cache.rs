//! Consumer-side cache entry that refreshes only on version change.

use crate::core::types::Result;
use super::{VersionStamp, Versioned};

/// A consumer-owned resource paired with the producer stamp it was built from.
///
/// Call [`VersionedCache::sync`] before every use; the cache never assumes it
/// is current without comparing stamps.
#[derive(Debug)]
pub struct VersionedCache<R> {
    last_seen: Option<VersionStamp>,
    resource: Option<R>,
    refresh_count: u64,
}

impl<R> VersionedCache<R> {
    /// Create an empty cache; the first sync always refreshes.
    pub fn new() -> Self {
        Self {
            last_seen: None,
            resource: None,
            refresh_count: 0,
        }
    }

    /// Bring the cached resource up to date with `producer`.
    ///
    /// Runs `refresh` iff the producer's stamp differs from the last one seen,
    /// then records the new stamp. Returns whether a refresh happened. A failed
    /// refresh leaves the previous stamp in place so the next sync retries.
    pub fn sync<P, F>(&mut self, producer: &P, refresh: F) -> Result<bool>
    where
        P: Versioned + ?Sized,
        F: FnOnce(&P) -> Result<R>,
    {
        let stamp = producer.version_stamp();
        if self.last_seen == Some(stamp) {
            return Ok(false);
        }

        let resource = refresh(producer)?;
        self.resource = Some(resource);
        self.last_seen = Some(stamp);
        self.refresh_count += 1;
        Ok(true)
    }

    /// The resource from the most recent successful refresh
    pub fn resource(&self) -> Option<&R> {
        self.resource.as_ref()
    }

    /// Stamp of the data currently held
    pub fn last_seen(&self) -> Option<VersionStamp> {
        self.last_seen
    }

    /// Number of refreshes performed so far (for diagnostics)
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    /// Force the next sync to refresh, e.g. after the backend lost its resources.
    pub fn invalidate(&mut self) {
        self.last_seen = None;
    }
}

impl<R> Default for VersionedCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::sync::ProducerId;

    struct Counter {
        id: ProducerId,
        version: u64,
        value: u32,
    }

    impl Counter {
        fn new(value: u32) -> Self {
            Self { id: ProducerId::next(), version: 0, value }
        }

        fn set(&mut self, value: u32) {
            self.value = value;
            self.version += 1;
        }
    }

    impl Versioned for Counter {
        fn version_stamp(&self) -> VersionStamp {
            VersionStamp { producer: self.id, version: self.version }
        }
    }

    #[test]
    fn test_first_sync_refreshes() {
        let producer = Counter::new(7);
        let mut cache = VersionedCache::new();
        assert!(cache.sync(&producer, |p| Ok(p.value)).unwrap());
        assert_eq!(cache.resource(), Some(&7));
        assert_eq!(cache.last_seen(), Some(producer.version_stamp()));
    }

    #[test]
    fn test_repeated_sync_refreshes_once() {
        let producer = Counter::new(1);
        let mut cache = VersionedCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            cache.sync(&producer, |p| {
                calls += 1;
                Ok(p.value)
            }).unwrap();
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.refresh_count(), 1);
    }

    #[test]
    fn test_version_change_refreshes() {
        let mut producer = Counter::new(1);
        let mut cache = VersionedCache::new();
        cache.sync(&producer, |p| Ok(p.value)).unwrap();

        producer.set(2);
        assert!(cache.sync(&producer, |p| Ok(p.value)).unwrap());
        assert_eq!(cache.resource(), Some(&2));
        assert!(!cache.sync(&producer, |p| Ok(p.value)).unwrap());
    }

    #[test]
    fn test_switching_producer_refreshes() {
        let a = Counter::new(1);
        let b = Counter::new(2);
        let mut cache = VersionedCache::new();

        cache.sync(&a, |p| Ok(p.value)).unwrap();
        // Same counter value, different producer
        assert!(cache.sync(&b, |p| Ok(p.value)).unwrap());
        assert_eq!(cache.resource(), Some(&2));
    }

    #[test]
    fn test_failed_refresh_retries() {
        let producer = Counter::new(3);
        let mut cache: VersionedCache<u32> = VersionedCache::new();

        let result = cache.sync(&producer, |_| Err(Error::Backend("device lost".into())));
        assert!(result.is_err());
        assert_eq!(cache.last_seen(), None);

        assert!(cache.sync(&producer, |p| Ok(p.value)).unwrap());
        assert_eq!(cache.resource(), Some(&3));
    }

    #[test]
    fn test_invalidate_forces_refresh() {
        let producer = Counter::new(4);
        let mut cache = VersionedCache::new();
        cache.sync(&producer, |p| Ok(p.value)).unwrap();

        cache.invalidate();
        assert!(cache.sync(&producer, |p| Ok(p.value)).unwrap());
        assert_eq!(cache.refresh_count(), 2);
    }
}
