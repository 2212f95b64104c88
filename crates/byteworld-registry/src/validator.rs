//! Whole-registry consistency validation.
//!
//! The validator consumes every record source of a tree, decodes it, and
//! checks both per-record rules (required fields, literal syntax, service
//! sub-types) and cross-record rules (ASN uniqueness, prefix uniqueness).
//! It never stops at the first problem: a run reports every violation in the
//! tree, and only a run with none produces a [`RegistryIndex`].
//!
//! Uniqueness is decided on the text of a key exactly as written. Two
//! spellings of one block, such as `2001:db8::/32` and `2001:0db8::/32`, are
//! different keys here.
//!
//! Prefixes live in two namespaces per family: the allocations embedded in
//! ASN records, and the standalone prefix records. A prefix may appear once
//! in each, so an ASN record and the prefix record describing its block do
//! not conflict with each other.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use byteworld_core::{
    parse_host, AddressFamily, AsnId, AsnRecord, Category, Entity, Network, PrefixRecord,
    ServiceCategory, ServiceRecord, Violation, ViolationKind, Violations,
};
use tracing::{debug, info};

use crate::config::RegistryLayout;
use crate::decoder::{decode, AsnDraft, Document, PrefixDraft, ServiceDraft};
use crate::error::{DecodeError, WalkError};
use crate::index::RegistryIndex;
use crate::walker::{RecordSource, RegistryWalker};

/// Validates the tree described by `layout` with a fresh traversal.
///
/// # Errors
///
/// Returns every violation found if the tree is not a valid registry.
pub fn validate(layout: &RegistryLayout) -> Result<RegistryIndex, Violations> {
    validate_sources(RegistryWalker::new(layout).walk())
}

/// Validates a sequence of record sources.
///
/// # Errors
///
/// Returns every violation found if the sources do not form a valid registry.
pub fn validate_sources<I>(sources: I) -> Result<RegistryIndex, Violations>
where
    I: IntoIterator<Item = Result<RecordSource, WalkError>>,
{
    let mut validator = RegistryValidator::new();
    for source in sources {
        validator.ingest(source);
    }
    validator.finish()
}

/// Accumulating validation state for one registry load.
#[derive(Debug, Default)]
pub struct RegistryValidator {
    asns: HashMap<AsnId, PathBuf>,
    asn_allocations: HashMap<(AddressFamily, String), PathBuf>,
    prefix_records: HashMap<(AddressFamily, String), PathBuf>,
    entities: Vec<Entity>,
    violations: Violations,
    files: usize,
}

impl RegistryValidator {
    /// Creates a validator with no records seen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one walker item through decoding and validation.
    pub fn ingest(&mut self, source: Result<RecordSource, WalkError>) {
        self.files += 1;
        let source = match source {
            Ok(source) => source,
            Err(err) => {
                self.violations
                    .add(Violation::decode(err.category(), err.path(), err.to_string()));
                return;
            }
        };

        debug!(category = %source.category, file = %source.path.display(), "Validating record");
        match decode(&source) {
            Ok(document) => self.check_document(source.category, &source.path, document),
            Err(err) => self.reject_decode(source.category, err),
        }
    }

    /// Returns the violations found so far.
    #[must_use]
    pub const fn violations(&self) -> &Violations {
        &self.violations
    }

    /// Ends the run, producing an index if no violation was found.
    ///
    /// # Errors
    ///
    /// Returns the complete violation list if any was found; no partial
    /// index is built.
    pub fn finish(self) -> Result<RegistryIndex, Violations> {
        if self.violations.is_empty() {
            info!(
                files = self.files,
                entities = self.entities.len(),
                "Registry validation passed"
            );
            Ok(RegistryIndex::build(self.entities))
        } else {
            info!(
                files = self.files,
                violations = self.violations.len(),
                "Registry validation failed"
            );
            Err(self.violations)
        }
    }

    fn reject_decode(&mut self, category: Category, err: DecodeError) {
        let mut violation = Violation::decode(category, err.file, err.message);
        violation.field = err.field;
        self.violations.add(violation);
    }

    fn check_document(&mut self, category: Category, file: &Path, document: Document) {
        match document {
            Document::Empty => {
                debug!(%category, file = %file.display(), "Empty record treated as absent");
            }
            Document::Asn(draft) => self.check_asn(file, draft),
            Document::Prefix(draft) => self.check_prefix(file, draft),
            Document::Services { category, entries } => self.check_services(file, &category, entries),
        }
    }

    fn check_asn(&mut self, file: &Path, draft: AsnDraft) {
        for (field, present) in [
            ("asn", draft.asn.is_some()),
            ("org", draft.org.is_some()),
            ("contact", draft.contact.is_some()),
            ("ipv4", draft.ipv4.is_some()),
            ("ipv6", draft.ipv6.is_some()),
        ] {
            if !present {
                self.violations
                    .add(Violation::missing_field(Category::Asn, file, field));
            }
        }

        if let Some(asn) = &draft.asn {
            match self.asns.entry(asn.clone()) {
                Entry::Occupied(first) => self.violations.add(Violation::duplicate(
                    ViolationKind::DuplicateKey,
                    Category::Asn,
                    file,
                    "asn",
                    &asn.to_string(),
                    first.get(),
                )),
                Entry::Vacant(slot) => {
                    slot.insert(file.to_path_buf());
                }
            }
        }

        if let Some(prefix) = &draft.ipv4 {
            self.check_asn_allocation(file, AddressFamily::V4, prefix);
        }
        if let Some(prefix) = &draft.ipv6 {
            self.check_asn_allocation(file, AddressFamily::V6, prefix);
        }

        if let AsnDraft {
            asn: Some(asn),
            org: Some(org),
            contact: Some(contact),
            ipv4: Some(ipv4),
            ipv6: Some(ipv6),
            metadata,
        } = draft
        {
            self.entities.push(Entity::Asn(AsnRecord {
                asn,
                org,
                contact,
                ipv4,
                ipv6,
                metadata,
            }));
        }
    }

    fn check_asn_allocation(&mut self, file: &Path, family: AddressFamily, prefix: &str) {
        let field = family.as_str();
        if let Err(err) = Network::parse_in(prefix, family) {
            self.violations.add(
                Violation::new(ViolationKind::MalformedPrefix, Category::Asn, file, err.to_string())
                    .with_field(field),
            );
            return;
        }

        if let Some(first) = claim(&mut self.asn_allocations, family, prefix, file) {
            self.violations.add(Violation::duplicate(
                ViolationKind::DuplicateAllocation,
                Category::Asn,
                file,
                field,
                prefix,
                &first,
            ));
        }
    }

    fn check_prefix(&mut self, file: &Path, draft: PrefixDraft) {
        let category = draft.family.category();
        let field = draft.family.as_str();
        let Some(prefix) = draft.prefix else {
            self.violations
                .add(Violation::missing_field(category, file, field));
            return;
        };

        if let Err(err) = Network::parse_in(&prefix, draft.family) {
            self.violations.add(
                Violation::new(ViolationKind::MalformedPrefix, category, file, err.to_string())
                    .with_field(field),
            );
            return;
        }

        if let Some(first) = claim(&mut self.prefix_records, draft.family, &prefix, file) {
            self.violations.add(Violation::duplicate(
                ViolationKind::DuplicateAllocation,
                category,
                file,
                field,
                &prefix,
                &first,
            ));
            return;
        }

        self.entities.push(Entity::Prefix(PrefixRecord {
            family: draft.family,
            prefix,
            metadata: draft.metadata,
        }));
    }

    fn check_services(
        &mut self,
        file: &Path,
        name: &str,
        entries: Option<Vec<Result<ServiceDraft, DecodeError>>>,
    ) {
        let category = match name.parse::<ServiceCategory>() {
            Ok(category) => Some(category),
            Err(err) => {
                self.violations.add(Violation::new(
                    ViolationKind::UnknownCategory,
                    Category::Services,
                    file,
                    err.to_string(),
                ));
                None
            }
        };

        let entries = match entries {
            Some(entries) if !entries.is_empty() => entries,
            _ => {
                self.violations.add(
                    Violation::new(
                        ViolationKind::MissingField,
                        Category::Services,
                        file,
                        "'services' must be a non-empty list",
                    )
                    .with_field("services"),
                );
                return;
            }
        };

        for entry in entries {
            match entry {
                Ok(draft) => self.check_service(file, category, draft),
                Err(err) => self.reject_decode(Category::Services, err),
            }
        }
    }

    fn check_service(&mut self, file: &Path, category: Option<ServiceCategory>, draft: ServiceDraft) {
        let position = draft.position;
        let field = |name: &str| format!("services[{position}].{name}");

        match (&draft.sub_type, category) {
            (None, _) => self
                .violations
                .add(Violation::missing_field(Category::Services, file, field("type"))),
            (Some(sub_type), Some(category)) if !category.accepts(sub_type) => {
                self.violations.add(
                    Violation::new(
                        ViolationKind::InvalidSubtype,
                        Category::Services,
                        file,
                        format!(
                            "'{sub_type}' is not a valid {category} type (expected one of {})",
                            category.subtypes().join(", ")
                        ),
                    )
                    .with_field(field("type")),
                );
            }
            _ => {}
        }

        for (family, address) in [
            (AddressFamily::V4, draft.ipv4.as_deref()),
            (AddressFamily::V6, draft.ipv6.as_deref()),
        ] {
            if let Some(Err(err)) = address.map(|a| parse_host(a, family)) {
                self.violations.add(
                    Violation::new(
                        ViolationKind::MalformedAddress,
                        Category::Services,
                        file,
                        err.to_string(),
                    )
                    .with_field(field(family.as_str())),
                );
            }
        }

        if let (Some(category), Some(sub_type)) = (category, draft.sub_type) {
            self.entities.push(Entity::Service(ServiceRecord {
                category,
                position,
                sub_type,
                ipv4: draft.ipv4,
                ipv6: draft.ipv6,
                metadata: draft.metadata,
            }));
        }
    }
}

/// Records `file` as the owner of `prefix`, returning the earlier owner if
/// the prefix was already claimed.
fn claim(
    owners: &mut HashMap<(AddressFamily, String), PathBuf>,
    family: AddressFamily,
    prefix: &str,
    file: &Path,
) -> Option<PathBuf> {
    match owners.entry((family, prefix.to_string())) {
        Entry::Occupied(first) => Some(first.get().clone()),
        Entry::Vacant(slot) => {
            slot.insert(file.to_path_buf());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asn_source(path: &str, contents: &str) -> Result<RecordSource, WalkError> {
        Ok(RecordSource::new(Category::Asn, path, contents))
    }

    fn run(sources: Vec<Result<RecordSource, WalkError>>) -> Result<RegistryIndex, Violations> {
        validate_sources(sources)
    }

    const AS65000: &str =
        "asn: 65000\norg: X\ncontact: a@x\nipv4: 198.51.100.0/24\nipv6: \"2001:db8::/32\"\n";

    #[test]
    fn test_valid_asn_record() {
        let index = run(vec![asn_source("a.yml", AS65000)]).unwrap();
        assert_eq!(index.asn_count(), 1);
        assert_eq!(
            index.lookup_asn(&AsnId::Number(65000)).unwrap().contact,
            "a@x"
        );
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let violations = run(vec![asn_source("a.yml", "asn: 65000\nipv4: 198.51.100.0/24\n")]).unwrap_err();
        let fields: Vec<_> = violations
            .of_kind(ViolationKind::MissingField)
            .iter()
            .filter_map(|v| v.field.clone())
            .collect();
        assert_eq!(fields, vec!["org", "contact", "ipv6"]);
    }

    #[test]
    fn test_duplicate_asn_references_both_files() {
        let violations = run(vec![
            asn_source("a.yml", AS65000),
            asn_source(
                "b.yml",
                "asn: 65000\norg: Y\ncontact: b@y\nipv4: 203.0.113.0/24\nipv6: \"2001:db8:1::/48\"\n",
            ),
        ])
        .unwrap_err();

        assert_eq!(violations.len(), 1);
        let dup = violations.iter().next().unwrap();
        assert_eq!(dup.kind, ViolationKind::DuplicateKey);
        assert_eq!(dup.file, PathBuf::from("b.yml"));
        assert_eq!(dup.conflicting_file, Some(PathBuf::from("a.yml")));
    }

    #[test]
    fn test_integer_and_string_asn_are_distinct() {
        let index = run(vec![
            asn_source("a.yml", AS65000),
            asn_source(
                "b.yml",
                "asn: \"65000\"\norg: Y\ncontact: b@y\nipv4: 203.0.113.0/24\nipv6: \"2001:db8:1::/48\"\n",
            ),
        ])
        .unwrap();
        assert_eq!(index.asn_count(), 2);
    }

    #[test]
    fn test_malformed_embedded_prefix() {
        let violations = run(vec![asn_source(
            "a.yml",
            "asn: 1\norg: X\ncontact: a@x\nipv4: 10.0.0.0/99\nipv6: \"2001:db8::/32\"\n",
        )])
        .unwrap_err();

        assert_eq!(violations.len(), 1);
        let v = violations.iter().next().unwrap();
        assert_eq!(v.kind, ViolationKind::MalformedPrefix);
        assert_eq!(v.field.as_deref(), Some("ipv4"));
    }

    #[test]
    fn test_embedded_prefix_family_must_match() {
        let violations = run(vec![asn_source(
            "a.yml",
            "asn: 1\norg: X\ncontact: a@x\nipv4: \"2001:db8::/32\"\nipv6: 198.51.100.0/24\n",
        )])
        .unwrap_err();
        assert_eq!(violations.of_kind(ViolationKind::MalformedPrefix).len(), 2);
    }

    #[test]
    fn test_duplicate_embedded_prefix() {
        let violations = run(vec![
            asn_source("a.yml", AS65000),
            asn_source(
                "b.yml",
                "asn: 65001\norg: Y\ncontact: b@y\nipv4: 198.51.100.0/24\nipv6: \"2001:db8:1::/48\"\n",
            ),
        ])
        .unwrap_err();

        let dups = violations.of_kind(ViolationKind::DuplicateAllocation);
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].field.as_deref(), Some("ipv4"));
        assert_eq!(dups[0].conflicting_file, Some(PathBuf::from("a.yml")));
    }

    #[test]
    fn test_differently_written_prefixes_not_detected() {
        let index = run(vec![
            asn_source(
                "a.yml",
                "asn: 1\norg: X\ncontact: a@x\nipv4: 198.51.100.0/24\nipv6: \"2001:db8::/32\"\n",
            ),
            asn_source(
                "b.yml",
                "asn: 2\norg: Y\ncontact: b@y\nipv4: 203.0.113.0/24\nipv6: \"2001:0db8::/32\"\n",
            ),
        ])
        .unwrap();
        assert_eq!(index.asn_count(), 2);
    }

    #[test]
    fn test_duplicate_and_field_checks_both_run() {
        let violations = run(vec![
            asn_source("a.yml", AS65000),
            asn_source("b.yml", "asn: 65000\norg: Y\nipv4: 10.0.0.1/24\nipv6: \"2001:db8:2::/48\"\n"),
        ])
        .unwrap_err();

        assert_eq!(violations.of_kind(ViolationKind::DuplicateKey).len(), 1);
        assert_eq!(violations.of_kind(ViolationKind::MissingField).len(), 1);
        assert_eq!(violations.of_kind(ViolationKind::MalformedPrefix).len(), 1);
    }

    #[test]
    fn test_prefix_records() {
        let index = run(vec![
            Ok(RecordSource::new(Category::Ipv4, "p4.yml", "ipv4: 192.0.2.0/24\n")),
            Ok(RecordSource::new(Category::Ipv6, "p6.yml", "ipv6: \"2001:db8::/32\"\n")),
        ])
        .unwrap();
        assert_eq!(index.prefix_count(AddressFamily::V4), 1);
        assert_eq!(index.prefix_count(AddressFamily::V6), 1);
    }

    #[test]
    fn test_prefix_record_and_asn_allocation_do_not_conflict() {
        let index = run(vec![
            asn_source("a.yml", AS65000),
            Ok(RecordSource::new(Category::Ipv4, "p4.yml", "ipv4: 198.51.100.0/24\n")),
        ])
        .unwrap();
        assert!(index
            .lookup_prefix(AddressFamily::V4, "198.51.100.0/24")
            .is_some());
    }

    #[test]
    fn test_duplicate_prefix_record() {
        let violations = run(vec![
            Ok(RecordSource::new(Category::Ipv4, "a.yml", "ipv4: 192.0.2.0/24\n")),
            Ok(RecordSource::new(Category::Ipv4, "b.yml", "ipv4: 192.0.2.0/24\n")),
            Ok(RecordSource::new(Category::Ipv6, "c.yml", "ipv6: \"2001:db8::/32\"\n")),
        ])
        .unwrap_err();

        assert_eq!(violations.len(), 1);
        let v = violations.iter().next().unwrap();
        assert_eq!(v.kind, ViolationKind::DuplicateAllocation);
        assert_eq!(v.category, Category::Ipv4);
    }

    #[test]
    fn test_prefix_record_missing_and_malformed() {
        let violations = run(vec![
            Ok(RecordSource::new(Category::Ipv4, "a.yml", "description: nothing\n")),
            Ok(RecordSource::new(Category::Ipv6, "b.yml", "ipv6: \"2001:db8::1/32\"\n")),
        ])
        .unwrap_err();
        assert_eq!(violations.of_kind(ViolationKind::MissingField).len(), 1);
        assert_eq!(violations.of_kind(ViolationKind::MalformedPrefix).len(), 1);
    }

    #[test]
    fn test_empty_records_are_absent() {
        let index = run(vec![
            asn_source("empty.yml", ""),
            Ok(RecordSource::new(Category::Ipv4, "empty.yml", "\n")),
        ])
        .unwrap();
        assert_eq!(index.asn_count(), 0);
    }

    #[test]
    fn test_services_valid_and_invalid_subtypes() {
        let index = run(vec![Ok(RecordSource::new(
            Category::Services,
            "services/dns.yml",
            "services:\n  - type: anycast\n    ipv4: 192.0.2.53\n    ipv6: \"2001:db8::53\"\n",
        ))])
        .unwrap();
        assert_eq!(index.service_count(ServiceCategory::Dns), 1);

        let violations = run(vec![Ok(RecordSource::new(
            Category::Services,
            "services/dns.yml",
            "services:\n  - type: stratum1\n",
        ))])
        .unwrap_err();
        let v = violations.iter().next().unwrap();
        assert_eq!(v.kind, ViolationKind::InvalidSubtype);
        assert_eq!(v.field.as_deref(), Some("services[0].type"));
    }

    #[test]
    fn test_services_unknown_category() {
        let violations = run(vec![Ok(RecordSource::new(
            Category::Services,
            "services/smtp.yml",
            "services:\n  - type: relay\n  - {}\n",
        ))])
        .unwrap_err();

        let unknown = violations.of_kind(ViolationKind::UnknownCategory);
        assert_eq!(unknown.len(), 1);
        assert_eq!(
            unknown[0].message,
            "smtp".parse::<ServiceCategory>().unwrap_err().to_string()
        );
        assert_eq!(unknown[0].message, "Unknown service category: smtp");
        assert_eq!(violations.of_kind(ViolationKind::InvalidSubtype).len(), 0);
        assert_eq!(violations.of_kind(ViolationKind::MissingField).len(), 1);
    }

    #[test]
    fn test_services_empty_or_missing_list() {
        for contents in ["", "services: []\n", "other: 1\n"] {
            let violations = run(vec![Ok(RecordSource::new(
                Category::Services,
                "services/ntp.yml",
                contents,
            ))])
            .unwrap_err();
            assert_eq!(violations.len(), 1, "{contents:?}");
            let v = violations.iter().next().unwrap();
            assert_eq!(v.kind, ViolationKind::MissingField);
            assert_eq!(v.field.as_deref(), Some("services"));
        }
    }

    #[test]
    fn test_services_malformed_addresses() {
        let violations = run(vec![Ok(RecordSource::new(
            Category::Services,
            "services/ntp.yml",
            "services:\n  - type: stratum2\n    ipv4: 192.0.2.0/24\n    ipv6: not-an-address\n",
        ))])
        .unwrap_err();

        let fields: Vec<_> = violations
            .of_kind(ViolationKind::MalformedAddress)
            .iter()
            .filter_map(|v| v.field.clone())
            .collect();
        assert_eq!(fields, vec!["services[0].ipv4", "services[0].ipv6"]);
    }

    #[test]
    fn test_decode_errors_do_not_abort() {
        let violations = run(vec![
            asn_source("broken.yml", "asn: [\n"),
            asn_source("a.yml", "asn: 1\n"),
            Err(WalkError::Read {
                category: Category::Ipv4,
                path: PathBuf::from("unreadable.yml"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            }),
        ])
        .unwrap_err();

        assert_eq!(violations.of_kind(ViolationKind::DecodeError).len(), 2);
        assert_eq!(violations.of_kind(ViolationKind::MissingField).len(), 4);
    }

    #[test]
    fn test_service_entry_decode_error_keeps_other_entries() {
        let violations = run(vec![Ok(RecordSource::new(
            Category::Services,
            "services/cdn.yml",
            "services:\n  - 42\n  - type: bogus\n",
        ))])
        .unwrap_err();

        assert_eq!(violations.of_kind(ViolationKind::DecodeError).len(), 1);
        assert_eq!(violations.of_kind(ViolationKind::InvalidSubtype).len(), 1);
    }

    #[test]
    fn test_validator_counts_violations_incrementally() {
        let mut validator = RegistryValidator::new();
        validator.ingest(asn_source("a.yml", "asn: 1\n"));
        assert_eq!(validator.violations().len(), 4);
        assert!(validator.finish().is_err());
    }
}
