//! Typed registry entities.
//!
//! These are the validated forms of registry records: every required field is
//! present and every literal has been checked. Keys that a record carries
//! beyond the known fields are kept verbatim in its [`Metadata`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::{AddressFamily, Category, ServiceCategory};

/// Free-form record fields, preserved as decoded.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// An Autonomous System Number identifier, kept exactly as written.
///
/// `65000` and `"65000"` are distinct identities.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AsnId {
    /// Integer identifier (`asn: 65000`).
    Number(u64),
    /// Textual identifier (`asn: "AS65000"`).
    Text(String),
}

impl AsnId {
    /// Returns the identities a textual lookup key may refer to, most
    /// specific first.
    ///
    /// A key made only of digits, written without leading zeros, may name an
    /// integer identifier or a string one; anything else can only name a
    /// string identifier.
    ///
    /// ```
    /// use byteworld_core::AsnId;
    ///
    /// assert_eq!(
    ///     AsnId::lookup_candidates("65000"),
    ///     vec![AsnId::Number(65000), AsnId::Text("65000".into())]
    /// );
    /// assert_eq!(AsnId::lookup_candidates("AS65000"), vec![AsnId::Text("AS65000".into())]);
    /// ```
    #[must_use]
    pub fn lookup_candidates(key: &str) -> Vec<Self> {
        let number = key
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| key.parse::<u64>().ok())
            .flatten()
            .filter(|n| n.to_string() == key);

        number
            .map(Self::Number)
            .into_iter()
            .chain(std::iter::once(Self::Text(key.to_string())))
            .collect()
    }
}

impl fmt::Display for AsnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for AsnId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for AsnId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// An ASN allocation with its single IPv4 and IPv6 prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsnRecord {
    /// The ASN identity.
    pub asn: AsnId,
    /// Holding organization.
    pub org: String,
    /// Contact for the allocation.
    pub contact: String,
    /// Allocated IPv4 prefix, as written.
    pub ipv4: String,
    /// Allocated IPv6 prefix, as written.
    pub ipv6: String,
    /// Any other fields from the record.
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// A prefix allocation in one address family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefixRecord {
    /// Namespace the prefix belongs to.
    pub family: AddressFamily,
    /// The prefix, as written.
    pub prefix: String,
    /// Any other fields from the record.
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// One entry of a services file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRecord {
    /// Category derived from the file's base name.
    pub category: ServiceCategory,
    /// Position within the category, in registry order.
    pub position: usize,
    /// Declared kind within the category.
    #[serde(rename = "type")]
    pub sub_type: String,
    /// Service IPv4 host address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    /// Service IPv6 host address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    /// Any other fields from the entry.
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// Any validated registry entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    /// An ASN record.
    Asn(AsnRecord),
    /// An IPv4 or IPv6 prefix record.
    Prefix(PrefixRecord),
    /// A service entry.
    Service(ServiceRecord),
}

impl Entity {
    /// Returns the registry category the entity belongs to.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Asn(_) => Category::Asn,
            Self::Prefix(record) => record.family.category(),
            Self::Service(_) => Category::Services,
        }
    }
}
