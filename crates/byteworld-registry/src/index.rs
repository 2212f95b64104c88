//! The immutable, queryable registry snapshot.

use std::collections::{BTreeMap, HashMap};

use byteworld_core::{
    AddressFamily, AsnId, AsnRecord, Entity, PrefixRecord, RegistryStats, ServiceCategory,
    ServiceRecord,
};
use chrono::{DateTime, Utc};

/// One validated registry, indexed by allocation key.
///
/// An index is only ever built from an entity set that passed validation and
/// offers no way to change it afterwards. Picking up changed records means
/// building a new index.
#[derive(Debug, Clone)]
pub struct RegistryIndex {
    asns: HashMap<AsnId, AsnRecord>,
    ipv4: HashMap<String, PrefixRecord>,
    ipv6: HashMap<String, PrefixRecord>,
    services: BTreeMap<ServiceCategory, Vec<ServiceRecord>>,
    loaded_at: DateTime<Utc>,
}

impl RegistryIndex {
    /// Builds an index from validated entities.
    ///
    /// Service entries keep the order they are given in and are renumbered
    /// so each position is unique within its category, even when the
    /// category is spread over several files.
    pub(crate) fn build(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut index = Self {
            asns: HashMap::new(),
            ipv4: HashMap::new(),
            ipv6: HashMap::new(),
            services: BTreeMap::new(),
            loaded_at: Utc::now(),
        };

        for entity in entities {
            match entity {
                Entity::Asn(record) => {
                    index.asns.insert(record.asn.clone(), record);
                }
                Entity::Prefix(record) => {
                    index
                        .prefixes_mut(record.family)
                        .insert(record.prefix.clone(), record);
                }
                Entity::Service(mut record) => {
                    let entries = index.services.entry(record.category).or_default();
                    record.position = entries.len();
                    entries.push(record);
                }
            }
        }

        index
    }

    const fn prefixes(&self, family: AddressFamily) -> &HashMap<String, PrefixRecord> {
        match family {
            AddressFamily::V4 => &self.ipv4,
            AddressFamily::V6 => &self.ipv6,
        }
    }

    fn prefixes_mut(&mut self, family: AddressFamily) -> &mut HashMap<String, PrefixRecord> {
        match family {
            AddressFamily::V4 => &mut self.ipv4,
            AddressFamily::V6 => &mut self.ipv6,
        }
    }

    /// Looks up an ASN record by exact identity.
    #[must_use]
    pub fn lookup_asn(&self, asn: &AsnId) -> Option<&AsnRecord> {
        self.asns.get(asn)
    }

    /// Looks up a prefix record by exact prefix string within one family.
    #[must_use]
    pub fn lookup_prefix(&self, family: AddressFamily, prefix: &str) -> Option<&PrefixRecord> {
        self.prefixes(family).get(prefix)
    }

    /// Returns the entries of a service category in registry order, or
    /// `None` if the registry defines no such services.
    #[must_use]
    pub fn list_services(&self, category: ServiceCategory) -> Option<&[ServiceRecord]> {
        self.services.get(&category).map(Vec::as_slice)
    }

    /// Returns the number of ASN records.
    #[must_use]
    pub fn asn_count(&self) -> usize {
        self.asns.len()
    }

    /// Returns the number of prefix records in one family.
    #[must_use]
    pub fn prefix_count(&self, family: AddressFamily) -> usize {
        self.prefixes(family).len()
    }

    /// Returns the number of entries in one service category.
    #[must_use]
    pub fn service_count(&self, category: ServiceCategory) -> usize {
        self.services.get(&category).map_or(0, Vec::len)
    }

    /// Returns when the index was built.
    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Returns per-category counts.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            asns: self.asn_count(),
            ipv4_prefixes: self.prefix_count(AddressFamily::V4),
            ipv6_prefixes: self.prefix_count(AddressFamily::V6),
            services: self
                .services
                .iter()
                .map(|(category, entries)| (category.as_str().to_string(), entries.len()))
                .collect(),
            loaded_at: self.loaded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteworld_core::Metadata;

    fn asn(n: u64) -> Entity {
        Entity::Asn(AsnRecord {
            asn: AsnId::Number(n),
            org: format!("org-{n}"),
            contact: "noc@example.net".to_string(),
            ipv4: "192.0.2.0/24".to_string(),
            ipv6: "2001:db8::/32".to_string(),
            metadata: Metadata::new(),
        })
    }

    fn prefix(family: AddressFamily, prefix: &str) -> Entity {
        Entity::Prefix(PrefixRecord {
            family,
            prefix: prefix.to_string(),
            metadata: Metadata::new(),
        })
    }

    fn service(category: ServiceCategory, position: usize, sub_type: &str) -> Entity {
        Entity::Service(ServiceRecord {
            category,
            position,
            sub_type: sub_type.to_string(),
            ipv4: None,
            ipv6: None,
            metadata: Metadata::new(),
        })
    }

    #[test]
    fn test_lookup_asn() {
        let index = RegistryIndex::build(vec![asn(65000), asn(65001)]);
        assert_eq!(index.lookup_asn(&AsnId::Number(65000)).unwrap().org, "org-65000");
        assert!(index.lookup_asn(&AsnId::Number(65002)).is_none());
        assert!(index.lookup_asn(&AsnId::Text("65000".to_string())).is_none());
    }

    #[test]
    fn test_lookup_prefix_is_per_family() {
        let index = RegistryIndex::build(vec![
            prefix(AddressFamily::V4, "192.0.2.0/24"),
            prefix(AddressFamily::V6, "2001:db8::/32"),
        ]);
        assert!(index.lookup_prefix(AddressFamily::V4, "192.0.2.0/24").is_some());
        assert!(index.lookup_prefix(AddressFamily::V6, "192.0.2.0/24").is_none());
        assert!(index.lookup_prefix(AddressFamily::V6, "2001:db8::/32").is_some());
        assert!(index.lookup_prefix(AddressFamily::V6, "2001:0db8::/32").is_none());
    }

    #[test]
    fn test_list_services_keeps_order() {
        let index = RegistryIndex::build(vec![
            service(ServiceCategory::Dns, 0, "recursive"),
            service(ServiceCategory::Ntp, 0, "stratum1"),
            service(ServiceCategory::Dns, 1, "anycast"),
        ]);

        let dns: Vec<_> = index
            .list_services(ServiceCategory::Dns)
            .unwrap()
            .iter()
            .map(|s| s.sub_type.as_str())
            .collect();
        assert_eq!(dns, vec!["recursive", "anycast"]);
        assert!(index.list_services(ServiceCategory::Cdn).is_none());
    }

    #[test]
    fn test_service_positions_unique_across_files() {
        let index = RegistryIndex::build(vec![
            service(ServiceCategory::Dns, 0, "recursive"),
            service(ServiceCategory::Dns, 1, "anycast"),
            service(ServiceCategory::Ntp, 0, "stratum1"),
            service(ServiceCategory::Dns, 0, "authoritative"),
        ]);

        let positions: Vec<_> = index
            .list_services(ServiceCategory::Dns)
            .unwrap()
            .iter()
            .map(|s| s.position)
            .collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(index.list_services(ServiceCategory::Ntp).unwrap()[0].position, 0);
    }

    #[test]
    fn test_stats() {
        let index = RegistryIndex::build(vec![
            asn(1),
            asn(2),
            prefix(AddressFamily::V4, "192.0.2.0/24"),
            service(ServiceCategory::Dns, 0, "anycast"),
            service(ServiceCategory::Dns, 1, "recursive"),
        ]);

        let stats = index.stats();
        assert_eq!(stats.asns, 2);
        assert_eq!(stats.ipv4_prefixes, 1);
        assert_eq!(stats.ipv6_prefixes, 0);
        assert_eq!(stats.services.get("dns"), Some(&2));
        assert_eq!(stats.services.get("ntp"), None);
        assert_eq!(stats.loaded_at, index.loaded_at());
        assert_eq!(index.service_count(ServiceCategory::Ntp), 0);
    }

    #[test]
    fn test_empty_index() {
        let index = RegistryIndex::build(Vec::new());
        assert_eq!(index.asn_count(), 0);
        assert_eq!(index.stats().total_services(), 0);
    }
}
