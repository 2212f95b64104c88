//! Point queries over the published registry.

use std::sync::Arc;

use byteworld_core::{
    AddressFamily, AsnId, AsnRecord, Network, PrefixRecord, RegistryStats, ServiceCategory,
    ServiceRecord,
};
use tracing::debug;

use crate::error::LookupError;
use crate::index::RegistryIndex;
use crate::store::RegistryStore;

/// Result type for lookups.
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Answers queries against whatever index the store currently publishes.
///
/// Each query checks the syntax of its argument before the index is
/// consulted, so a malformed argument is reported as
/// [`LookupError::BadInput`] even when no index is loaded, and a well-formed
/// argument that names nothing is reported as [`LookupError::NotFound`].
///
/// Every query reads a single snapshot; a reload that lands mid-query does
/// not affect it.
#[derive(Debug, Clone)]
pub struct LookupService {
    store: Arc<RegistryStore>,
}

impl LookupService {
    /// Creates a service reading from `store`.
    #[must_use]
    pub const fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    /// Returns the store the service reads from.
    #[must_use]
    pub const fn store(&self) -> &Arc<RegistryStore> {
        &self.store
    }

    fn index(&self) -> LookupResult<Arc<RegistryIndex>> {
        self.store.snapshot().ok_or(LookupError::Unavailable)
    }

    /// Looks up an ASN record.
    ///
    /// An all-digit key matches an integer identifier first, then a string
    /// identifier with the same text.
    ///
    /// # Errors
    ///
    /// Returns `BadInput` for an empty or padded key and `NotFound` if no
    /// record has the identity.
    pub fn asn(&self, key: &str) -> LookupResult<AsnRecord> {
        if key.is_empty() || key.trim() != key {
            return Err(LookupError::bad_input(format!("'{key}' is not an ASN")));
        }

        let index = self.index()?;
        AsnId::lookup_candidates(key)
            .iter()
            .find_map(|candidate| index.lookup_asn(candidate))
            .cloned()
            .ok_or_else(|| {
                debug!(asn = key, "ASN lookup missed");
                LookupError::not_found("ASN")
            })
    }

    /// Looks up a prefix record, with the family given by name.
    ///
    /// # Errors
    ///
    /// Returns `BadInput` if `family` is not `ipv4` or `ipv6`, or if `prefix`
    /// is not a network of that family.
    pub fn prefix(&self, family: &str, prefix: &str) -> LookupResult<PrefixRecord> {
        let family = family
            .parse::<AddressFamily>()
            .map_err(|e| LookupError::bad_input(e.to_string()))?;
        self.prefix_in(family, prefix)
    }

    /// Looks up a prefix record within one family.
    ///
    /// The prefix is matched exactly as written once it has been checked to
    /// be a network of `family`.
    ///
    /// # Errors
    ///
    /// Returns `BadInput` if `prefix` is not a network of `family` and
    /// `NotFound` if no record holds it.
    pub fn prefix_in(&self, family: AddressFamily, prefix: &str) -> LookupResult<PrefixRecord> {
        let label = family_label(family);
        Network::parse_in(prefix, family)
            .map_err(|e| LookupError::bad_input(format!("Invalid {label} prefix: {e}")))?;

        let index = self.index()?;
        index.lookup_prefix(family, prefix).cloned().ok_or_else(|| {
            debug!(%family, prefix, "Prefix lookup missed");
            LookupError::not_found(format!("{label} prefix"))
        })
    }

    /// Lists the entries of a service category in registry order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category is unknown or the registry defines
    /// no services in it.
    pub fn services(&self, category: &str) -> LookupResult<Vec<ServiceRecord>> {
        let not_found = || LookupError::not_found("Service type");
        let category = category.parse::<ServiceCategory>().map_err(|_| not_found())?;

        self.index()?
            .list_services(category)
            .map(<[ServiceRecord]>::to_vec)
            .ok_or_else(not_found)
    }

    /// Returns per-category counts of the published index.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if nothing has been published.
    pub fn stats(&self) -> LookupResult<RegistryStats> {
        Ok(self.index()?.stats())
    }
}

const fn family_label(family: AddressFamily) -> &'static str {
    match family {
        AddressFamily::V4 => "IPv4",
        AddressFamily::V6 => "IPv6",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryLayout;
    use byteworld_test::RegistryFixture;

    fn sample_service() -> (RegistryFixture, LookupService) {
        let fixture = RegistryFixture::sample().unwrap();
        let store = Arc::new(RegistryStore::new());
        store.reload(&RegistryLayout::standard(fixture.root())).unwrap();
        (fixture, LookupService::new(store))
    }

    #[test]
    fn test_asn_found_and_not_found() {
        let (_fixture, lookup) = sample_service();
        let record = lookup.asn("65000").unwrap();
        assert_eq!(record.asn, AsnId::Number(65000));
        assert_eq!(record.ipv4, "198.51.100.0/24");

        assert_eq!(lookup.asn("65999"), Err(LookupError::not_found("ASN")));
        assert_eq!(lookup.asn("AS65000"), Err(LookupError::not_found("ASN")));
    }

    #[test]
    fn test_asn_bad_input() {
        let (_fixture, lookup) = sample_service();
        assert!(matches!(lookup.asn(""), Err(LookupError::BadInput { .. })));
        assert!(matches!(lookup.asn(" 65000"), Err(LookupError::BadInput { .. })));
    }

    #[test]
    fn test_prefix_bad_input_distinct_from_not_found() {
        let (_fixture, lookup) = sample_service();

        assert!(lookup.prefix("ipv4", "198.51.100.0/24").is_ok());
        assert!(matches!(
            lookup.prefix("ipv4", "10.0.0.0/99"),
            Err(LookupError::BadInput { .. })
        ));
        assert_eq!(
            lookup.prefix("ipv4", "10.0.0.0/8").unwrap_err().to_string(),
            "IPv4 prefix not found"
        );
        assert!(matches!(
            lookup.prefix("ipv6", "198.51.100.0/24"),
            Err(LookupError::BadInput { .. })
        ));
        assert!(matches!(
            lookup.prefix("ipx", "198.51.100.0/24"),
            Err(LookupError::BadInput { .. })
        ));
    }

    #[test]
    fn test_prefix_matches_exact_text() {
        let (_fixture, lookup) = sample_service();
        assert!(lookup.prefix_in(AddressFamily::V6, "2001:db8::/32").is_ok());
        assert!(matches!(
            lookup.prefix_in(AddressFamily::V6, "2001:0db8::/32"),
            Err(LookupError::NotFound { .. })
        ));
    }

    #[test]
    fn test_services() {
        let (_fixture, lookup) = sample_service();
        let dns = lookup.services("dns").unwrap();
        let types: Vec<_> = dns.iter().map(|s| s.sub_type.as_str()).collect();
        assert_eq!(types, vec!["authoritative", "anycast"]);

        assert!(matches!(lookup.services("smtp"), Err(LookupError::NotFound { .. })));
    }

    #[test]
    fn test_known_category_without_file_is_not_found() {
        let fixture = RegistryFixture::new().unwrap();
        let store = Arc::new(RegistryStore::new());
        store.reload(&RegistryLayout::standard(fixture.root())).unwrap();
        let lookup = LookupService::new(store);
        assert!(matches!(lookup.services("ntp"), Err(LookupError::NotFound { .. })));
    }

    #[test]
    fn test_unavailable_before_first_load() {
        let lookup = LookupService::new(Arc::new(RegistryStore::new()));
        assert_eq!(lookup.asn("65000"), Err(LookupError::Unavailable));
        assert_eq!(lookup.stats(), Err(LookupError::Unavailable));
        assert!(matches!(
            lookup.prefix("ipv4", "not-a-prefix"),
            Err(LookupError::BadInput { .. })
        ));
    }

    #[test]
    fn test_stats() {
        let (_fixture, lookup) = sample_service();
        let stats = lookup.stats().unwrap();
        assert_eq!(stats.asns, 2);
        assert_eq!(stats.ipv4_prefixes, 2);
        assert_eq!(stats.ipv6_prefixes, 1);
        assert_eq!(stats.total_services(), 4);
    }
}
