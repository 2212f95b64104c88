//! Atomic publication of registry snapshots.
//!
//! Readers take a snapshot with [`RegistryStore::snapshot`] and keep using it
//! for as long as they hold the `Arc`, regardless of later reloads. A reload
//! builds a complete new index before publishing it, so a reader never sees a
//! half-built registry, and a reload that fails validation leaves the
//! previously published index in place.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::{info, warn};

use crate::config::RegistryLayout;
use crate::error::RegistryError;
use crate::index::RegistryIndex;
use crate::validator::validate;

/// Holds the currently published registry index.
#[derive(Debug, Default)]
pub struct RegistryStore {
    current: ArcSwapOption<RegistryIndex>,
    generation: AtomicU64,
}

impl RegistryStore {
    /// Creates a store with nothing published.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the published index, returning the new snapshot.
    pub fn publish(&self, index: RegistryIndex) -> Arc<RegistryIndex> {
        let index = Arc::new(index);
        self.current.store(Some(Arc::clone(&index)));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(
            generation,
            asns = index.asn_count(),
            "Published registry snapshot"
        );
        index
    }

    /// Returns the published index, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<RegistryIndex>> {
        self.current.load_full()
    }

    /// Returns true once an index has been published.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.current.load().is_some()
    }

    /// Number of indexes published so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Validates the tree described by `layout` and publishes the result.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Invalid`] with every violation found if the
    /// tree does not validate. The previously published index, if any, stays
    /// published.
    pub fn reload(&self, layout: &RegistryLayout) -> Result<Arc<RegistryIndex>, RegistryError> {
        match validate(layout) {
            Ok(index) => Ok(self.publish(index)),
            Err(violations) => {
                warn!(
                    violations = violations.len(),
                    generation = self.generation(),
                    "Registry reload rejected, keeping previous snapshot"
                );
                Err(RegistryError::from(violations))
            }
        }
    }
}
