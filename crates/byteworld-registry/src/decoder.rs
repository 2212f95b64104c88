//! Record decoding.
//!
//! The decoder turns the text of one record file into a [`Document`]. It only
//! rejects text that is not a structured document of the right shape; a
//! required field that is simply absent decodes as `None` and is left to the
//! validator to report.

use std::path::{Path, PathBuf};

use byteworld_core::{AddressFamily, AsnId, Category, Metadata};
use serde_yaml::{Mapping, Value};

use crate::error::DecodeError;
use crate::walker::RecordSource;

/// A decoded ASN record whose fields have not yet been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct AsnDraft {
    /// The `asn` field.
    pub asn: Option<AsnId>,
    /// The `org` (or `organization`) field.
    pub org: Option<String>,
    /// The `contact` field.
    pub contact: Option<String>,
    /// The `ipv4` field.
    pub ipv4: Option<String>,
    /// The `ipv6` field.
    pub ipv6: Option<String>,
    /// Remaining fields.
    pub metadata: Metadata,
}

/// A decoded prefix record whose fields have not yet been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixDraft {
    /// Namespace from the record's category.
    pub family: AddressFamily,
    /// The key field, named after the family (or `prefix`).
    pub prefix: Option<String>,
    /// Remaining fields.
    pub metadata: Metadata,
}

/// A decoded service entry whose fields have not yet been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDraft {
    /// Position within the `services` list.
    pub position: usize,
    /// The `type` field.
    pub sub_type: Option<String>,
    /// The `ipv4` field.
    pub ipv4: Option<String>,
    /// The `ipv6` field.
    pub ipv6: Option<String>,
    /// Remaining fields.
    pub metadata: Metadata,
}

/// The decoded content of one record file.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// The file holds no document.
    Empty,
    /// An ASN record.
    Asn(AsnDraft),
    /// A prefix record.
    Prefix(PrefixDraft),
    /// A services file.
    Services {
        /// Service category name, from the file's base name.
        category: String,
        /// The `services` list; `None` if the document or the key is absent.
        /// Each entry is decoded independently.
        entries: Option<Vec<Result<ServiceDraft, DecodeError>>>,
    },
}

/// Decodes one record source according to its category.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the text is not a single structured document,
/// is not a mapping, or has a field of the wrong type.
pub fn decode(source: &RecordSource) -> Result<Document, DecodeError> {
    let path = source.path.as_path();
    let value = parse_document(path, &source.contents)?;

    match source.category {
        Category::Services => {
            let category = service_category_name(path);
            if value.is_null() {
                return Ok(Document::Services {
                    category,
                    entries: None,
                });
            }
            let entries = decode_services(path, value)?;
            Ok(Document::Services { category, entries })
        }
        _ if value.is_null() => Ok(Document::Empty),
        Category::Asn => decode_asn(path, value).map(Document::Asn),
        Category::Ipv4 => decode_prefix(path, AddressFamily::V4, value).map(Document::Prefix),
        Category::Ipv6 => decode_prefix(path, AddressFamily::V6, value).map(Document::Prefix),
    }
}

fn parse_document(path: &Path, contents: &str) -> Result<Value, DecodeError> {
    if contents.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(contents).map_err(|e| DecodeError::document(path, e.to_string()))
}

fn service_category_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn decode_asn(path: &Path, value: Value) -> Result<AsnDraft, DecodeError> {
    let mut fields = Fields::from_value(path, None, value)?;
    let asn = fields.asn("asn")?;
    let org = match fields.string("org")? {
        Some(org) => Some(org),
        None => fields.string("organization")?,
    };
    Ok(AsnDraft {
        asn,
        org,
        contact: fields.string("contact")?,
        ipv4: fields.string("ipv4")?,
        ipv6: fields.string("ipv6")?,
        metadata: fields.into_metadata()?,
    })
}

fn decode_prefix(path: &Path, family: AddressFamily, value: Value) -> Result<PrefixDraft, DecodeError> {
    let mut fields = Fields::from_value(path, None, value)?;
    let prefix = match fields.string(family.as_str())? {
        Some(prefix) => Some(prefix),
        None => fields.string("prefix")?,
    };
    Ok(PrefixDraft {
        family,
        prefix,
        metadata: fields.into_metadata()?,
    })
}

fn decode_services(
    path: &Path,
    value: Value,
) -> Result<Option<Vec<Result<ServiceDraft, DecodeError>>>, DecodeError> {
    let Value::Mapping(mut mapping) = value else {
        return Err(DecodeError::document(
            path,
            format!("expected a mapping, found {}", describe(&value)),
        ));
    };

    match mapping.remove("services") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Sequence(items)) => Ok(Some(
            items
                .into_iter()
                .enumerate()
                .map(|(position, item)| decode_service(path, position, item))
                .collect(),
        )),
        Some(other) => Err(DecodeError::field(
            path,
            "services",
            format!("expected a list, found {}", describe(&other)),
        )),
    }
}

fn decode_service(path: &Path, position: usize, value: Value) -> Result<ServiceDraft, DecodeError> {
    let mut fields = Fields::from_value(path, Some(format!("services[{position}]")), value)?;
    Ok(ServiceDraft {
        position,
        sub_type: fields.string("type")?,
        ipv4: fields.string("ipv4")?,
        ipv6: fields.string("ipv6")?,
        metadata: fields.into_metadata()?,
    })
}

/// Field extraction over one mapping, reporting errors against `file`.
struct Fields {
    file: PathBuf,
    scope: Option<String>,
    mapping: Mapping,
}

impl Fields {
    fn from_value(file: &Path, scope: Option<String>, value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Mapping(mapping) => Ok(Self {
                file: file.to_path_buf(),
                scope,
                mapping,
            }),
            other => {
                let message = format!("expected a mapping, found {}", describe(&other));
                Err(match scope {
                    Some(scope) => DecodeError::field(file, scope, message),
                    None => DecodeError::document(file, message),
                })
            }
        }
    }

    fn qualified(&self, key: &str) -> String {
        match &self.scope {
            Some(scope) => format!("{scope}.{key}"),
            None => key.to_string(),
        }
    }

    fn string(&mut self, key: &str) -> Result<Option<String>, DecodeError> {
        match self.mapping.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(DecodeError::field(
                &self.file,
                self.qualified(key),
                format!("expected a string, found {}", describe(&other)),
            )),
        }
    }

    fn asn(&mut self, key: &str) -> Result<Option<AsnId>, DecodeError> {
        match self.mapping.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(AsnId::Text(s))),
            Some(Value::Number(n)) => n.as_u64().map(AsnId::Number).map(Some).ok_or_else(|| {
                DecodeError::field(
                    &self.file,
                    self.qualified(key),
                    format!("{n} is not a non-negative integer"),
                )
            }),
            Some(other) => Err(DecodeError::field(
                &self.file,
                self.qualified(key),
                format!("expected an integer or string, found {}", describe(&other)),
            )),
        }
    }

    fn into_metadata(self) -> Result<Metadata, DecodeError> {
        serde_yaml::from_value(Value::Mapping(self.mapping)).map_err(|e| match self.scope {
            Some(scope) => DecodeError::field(&self.file, scope, e.to_string()),
            None => DecodeError::document(&self.file, e.to_string()),
        })
    }
}

const fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(category: Category, path: &str, contents: &str) -> RecordSource {
        RecordSource::new(category, path, contents)
    }

    #[test]
    fn test_decode_asn_record() {
        let doc = decode(&source(
            Category::Asn,
            "registry/asn/as65000.yml",
            "asn: 65000\norg: X\ncontact: a@x\nipv4: 198.51.100.0/24\nipv6: \"2001:db8::/32\"\ncountry: NL\n",
        ))
        .unwrap();

        let Document::Asn(draft) = doc else {
            panic!("expected an ASN document, got {doc:?}");
        };
        assert_eq!(draft.asn, Some(AsnId::Number(65000)));
        assert_eq!(draft.org.as_deref(), Some("X"));
        assert_eq!(draft.ipv4.as_deref(), Some("198.51.100.0/24"));
        assert_eq!(draft.ipv6.as_deref(), Some("2001:db8::/32"));
        assert_eq!(draft.metadata.get("country"), Some(&json!("NL")));
    }

    #[test]
    fn test_decode_asn_text_identifier_and_organization_alias() {
        let doc = decode(&source(Category::Asn, "a.yml", "asn: AS65000\norganization: Y\n")).unwrap();
        let Document::Asn(draft) = doc else {
            panic!("expected an ASN document");
        };
        assert_eq!(draft.asn, Some(AsnId::Text("AS65000".to_string())));
        assert_eq!(draft.org.as_deref(), Some("Y"));
        assert!(draft.contact.is_none());
    }

    #[test]
    fn test_decode_missing_fields_are_none() {
        let doc = decode(&source(Category::Asn, "a.yml", "asn: 1\n")).unwrap();
        let Document::Asn(draft) = doc else {
            panic!("expected an ASN document");
        };
        assert!(draft.org.is_none());
        assert!(draft.ipv4.is_none());
    }

    #[test]
    fn test_decode_empty_file() {
        assert_eq!(decode(&source(Category::Asn, "a.yml", "")).unwrap(), Document::Empty);
        assert_eq!(
            decode(&source(Category::Ipv4, "a.yml", "  \n\n")).unwrap(),
            Document::Empty
        );
        assert_eq!(
            decode(&source(Category::Ipv6, "a.yml", "~\n")).unwrap(),
            Document::Empty
        );
    }

    #[test]
    fn test_decode_malformed_syntax() {
        let err = decode(&source(Category::Asn, "bad.yml", "asn: [1, 2\n")).unwrap_err();
        assert_eq!(err.file, PathBuf::from("bad.yml"));
        assert!(err.field.is_none());
    }

    #[test]
    fn test_decode_wrong_shape() {
        let err = decode(&source(Category::Asn, "list.yml", "- 1\n- 2\n")).unwrap_err();
        assert!(err.message.contains("expected a mapping"));
    }

    #[test]
    fn test_decode_wrong_field_type_names_field() {
        let err = decode(&source(Category::Asn, "a.yml", "asn: 1\nipv4: [1]\n")).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("ipv4"));

        let err = decode(&source(Category::Asn, "a.yml", "asn: -5\n")).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("asn"));
    }

    #[test]
    fn test_decode_multiple_documents_rejected() {
        assert!(decode(&source(Category::Asn, "a.yml", "asn: 1\n---\nasn: 2\n")).is_err());
    }

    #[test]
    fn test_decode_prefix_keyed_by_family() {
        let doc = decode(&source(
            Category::Ipv4,
            "registry/ipv4/net.yml",
            "ipv4: 192.0.2.0/24\ndescription: docs\n",
        ))
        .unwrap();
        let Document::Prefix(draft) = doc else {
            panic!("expected a prefix document");
        };
        assert_eq!(draft.family, AddressFamily::V4);
        assert_eq!(draft.prefix.as_deref(), Some("192.0.2.0/24"));
        assert_eq!(draft.metadata.get("description"), Some(&json!("docs")));
    }

    #[test]
    fn test_decode_prefix_alias() {
        let doc = decode(&source(Category::Ipv6, "net.yml", "prefix: \"2001:db8::/32\"\n")).unwrap();
        let Document::Prefix(draft) = doc else {
            panic!("expected a prefix document");
        };
        assert_eq!(draft.family, AddressFamily::V6);
        assert_eq!(draft.prefix.as_deref(), Some("2001:db8::/32"));
    }

    #[test]
    fn test_decode_services_file() {
        let doc = decode(&source(
            Category::Services,
            "services/dns.yml",
            "services:\n  - name: ns1\n    type: anycast\n    ipv4: 192.0.2.53\n  - type: recursive\n",
        ))
        .unwrap();

        let Document::Services { category, entries } = doc else {
            panic!("expected a services document");
        };
        assert_eq!(category, "dns");
        let entries = entries.unwrap();
        assert_eq!(entries.len(), 2);
        let first = entries[0].as_ref().unwrap();
        assert_eq!(first.position, 0);
        assert_eq!(first.sub_type.as_deref(), Some("anycast"));
        assert_eq!(first.metadata.get("name"), Some(&json!("ns1")));
        assert_eq!(entries[1].as_ref().unwrap().position, 1);
    }

    #[test]
    fn test_decode_services_entries_independently() {
        let doc = decode(&source(
            Category::Services,
            "services/ntp.yml",
            "services:\n  - plain string\n  - type: stratum1\n",
        ))
        .unwrap();

        let Document::Services { entries, .. } = doc else {
            panic!("expected a services document");
        };
        let entries = entries.unwrap();
        let err = entries[0].as_ref().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("services[0]"));
        assert!(entries[1].is_ok());
    }

    #[test]
    fn test_decode_services_absent_or_empty() {
        for contents in ["", "services:\n", "other: 1\n"] {
            let doc = decode(&source(Category::Services, "services/cdn.yml", contents)).unwrap();
            assert!(
                matches!(doc, Document::Services { entries: None, .. }),
                "{contents:?} should decode without entries"
            );
        }

        let doc = decode(&source(Category::Services, "services/cdn.yml", "services: []\n")).unwrap();
        assert!(matches!(doc, Document::Services { entries: Some(ref e), .. } if e.is_empty()));
    }

    #[test]
    fn test_decode_services_not_a_list() {
        let err = decode(&source(Category::Services, "services/dns.yml", "services: 3\n")).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("services"));
    }

    #[test]
    fn test_decode_service_field_type_is_scoped() {
        let doc = decode(&source(
            Category::Services,
            "services/dns.yml",
            "services:\n  - type: anycast\n    ipv4: 7\n",
        ))
        .unwrap();
        let Document::Services { entries, .. } = doc else {
            panic!("expected a services document");
        };
        let entries = entries.unwrap();
        assert_eq!(
            entries[0].as_ref().unwrap_err().field.as_deref(),
            Some("services[0].ipv4")
        );
    }
}
