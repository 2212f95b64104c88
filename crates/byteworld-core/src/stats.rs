//! Registry size reporting.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-category entity counts for one published registry snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Number of ASN records.
    pub asns: usize,
    /// Number of IPv4 prefix records.
    pub ipv4_prefixes: usize,
    /// Number of IPv6 prefix records.
    pub ipv6_prefixes: usize,
    /// Number of service entries, keyed by service category name.
    pub services: BTreeMap<String, usize>,
    /// When the snapshot was built.
    pub loaded_at: DateTime<Utc>,
}

impl RegistryStats {
    /// Returns the number of service entries across all categories.
    #[must_use]
    pub fn total_services(&self) -> usize {
        self.services.values().sum()
    }
}
