//! Registry partitions and closed enumerations.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A top-level registry partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Autonomous System Number records.
    Asn,
    /// IPv4 prefix records.
    Ipv4,
    /// IPv6 prefix records.
    Ipv6,
    /// Service definition files.
    Services,
}

impl Category {
    /// All categories, in traversal order.
    pub const ALL: [Self; 4] = [Self::Asn, Self::Ipv4, Self::Ipv6, Self::Services];

    /// Returns the category name as used in paths and reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asn => "asn",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Services => "services",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory { name: s.to_string() })
    }
}

/// IP address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    /// IPv4.
    #[serde(rename = "ipv4")]
    V4,
    /// IPv6.
    #[serde(rename = "ipv6")]
    V6,
}

impl AddressFamily {
    /// Returns the family of an address.
    #[must_use]
    pub const fn of(address: &IpAddr) -> Self {
        match address {
            IpAddr::V4(_) => Self::V4,
            IpAddr::V6(_) => Self::V6,
        }
    }

    /// Returns the family name (`ipv4` or `ipv6`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V4 => "ipv4",
            Self::V6 => "ipv6",
        }
    }

    /// Returns the address width in bits.
    #[must_use]
    pub const fn max_prefix_len(&self) -> u8 {
        match self {
            Self::V4 => 32,
            Self::V6 => 128,
        }
    }

    /// Returns the registry category holding prefix records of this family.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::V4 => Category::Ipv4,
            Self::V6 => Category::Ipv6,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ipv4" => Ok(Self::V4),
            "ipv6" => Ok(Self::V6),
            other => Err(Error::UnknownAddressFamily {
                name: other.to_string(),
            }),
        }
    }
}

const DNS_SUBTYPES: &[&str] = &["authoritative", "recursive", "anycast"];
const NTP_SUBTYPES: &[&str] = &["stratum1", "stratum2", "anycast"];
const CDN_SUBTYPES: &[&str] = &["regional", "anycast", "experimental"];

/// An infrastructure service category, each bound to a closed set of sub-types.
///
/// The category of a services file is its base name: `services/dns.yml`
/// holds [`ServiceCategory::Dns`] entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    /// Name resolution.
    Dns,
    /// Time distribution.
    Ntp,
    /// Content delivery.
    Cdn,
}

impl ServiceCategory {
    /// All service categories.
    pub const ALL: [Self; 3] = [Self::Dns, Self::Ntp, Self::Cdn];

    /// Returns the category name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dns => "dns",
            Self::Ntp => "ntp",
            Self::Cdn => "cdn",
        }
    }

    /// Returns the sub-types this category accepts.
    #[must_use]
    pub const fn subtypes(&self) -> &'static [&'static str] {
        match self {
            Self::Dns => DNS_SUBTYPES,
            Self::Ntp => NTP_SUBTYPES,
            Self::Cdn => CDN_SUBTYPES,
        }
    }

    /// Returns true if `sub_type` belongs to this category's enumeration.
    ///
    /// Matching is exact; no case folding.
    ///
    /// ```
    /// use byteworld_core::ServiceCategory;
    ///
    /// assert!(ServiceCategory::Dns.accepts("anycast"));
    /// assert!(!ServiceCategory::Dns.accepts("stratum1"));
    /// ```
    #[must_use]
    pub fn accepts(&self, sub_type: &str) -> bool {
        self.subtypes().contains(&sub_type)
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::UnknownServiceCategory { name: s.to_string() })
    }
}
