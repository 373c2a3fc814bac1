//! Version-stamped producer/consumer synchronization.
//!
//! Large buffers (the encoded field volume, the brush mask) are produced on
//! the CPU and consumed by a rendering backend. Producers carry a version
//! counter that bumps on every mutation; consumers keep the last stamp they
//! uploaded and only refresh when it differs.

pub mod cache;

pub use cache::VersionedCache;

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PRODUCER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a versioned producer.
///
/// Lets a cache notice that it is now looking at a *different* mask or field
/// whose counter happens to equal the last one it saw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProducerId(u64);

impl ProducerId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        Self(NEXT_PRODUCER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Snapshot of a producer's identity and data version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VersionStamp {
    pub producer: ProducerId,
    pub version: u64,
}

/// Anything whose contents can be cached by version.
pub trait Versioned {
    /// Current identity + version; must change whenever the contents change.
    fn version_stamp(&self) -> VersionStamp;
}

/// A value that never changes after construction.
///
/// Gives static buffers (noise, kernel) a stamp so they go through the same
/// cache policy as everything else and get uploaded once per consumer.
#[derive(Debug)]
pub struct Frozen<T> {
    value: T,
    id: ProducerId,
}

impl<T> Frozen<T> {
    pub fn new(value: T) -> Self {
        Self { value, id: ProducerId::next() }
    }

    pub fn get(&self) -> &T {
        &self.value
    }
}

impl<T> Versioned for Frozen<T> {
    fn version_stamp(&self) -> VersionStamp {
        VersionStamp { producer: self.id, version: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frozen_stamp_is_stable() {
        let frozen = Frozen::new(5u8);
        assert_eq!(frozen.version_stamp(), frozen.version_stamp());
        assert_eq!(*frozen.get(), 5);
        assert_ne!(Frozen::new(5u8).version_stamp(), frozen.version_stamp());
    }

    #[test]
    fn test_producer_ids_unique() {
        let a = ProducerId::next();
        let b = ProducerId::next();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }
}
