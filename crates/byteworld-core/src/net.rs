//! Network and host literal parsing.
//!
//! Registry records and lookup queries carry addresses as text. This module
//! decides whether such text is a well-formed network (`address[/len]`) or a
//! well-formed host address, optionally pinned to an [`AddressFamily`].
//!
//! Parsing is purely syntactic. Two literals that denote the same block but
//! are written differently (`2001:db8::/32` and `2001:0db8::/32`) both parse;
//! nothing here canonicalizes them.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::category::AddressFamily;

/// Errors produced while parsing network or host literals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    /// The address part is not an IPv4 or IPv6 address.
    #[error("'{input}' is not a valid IP address")]
    InvalidAddress {
        /// The rejected literal.
        input: String,
    },

    /// The mask length is not a decimal number within the family width.
    #[error("'{input}' has an invalid prefix length (maximum {max})")]
    InvalidPrefixLength {
        /// The rejected literal.
        input: String,
        /// Widest mask allowed for the address family.
        max: u8,
    },

    /// Bits beyond the mask are set.
    #[error("'{input}' has host bits set")]
    HostBitsSet {
        /// The rejected literal.
        input: String,
    },

    /// The literal parsed but belongs to the other address family.
    #[error("'{input}' is not an {expected} literal")]
    FamilyMismatch {
        /// The rejected literal.
        input: String,
        /// Family the caller required.
        expected: AddressFamily,
    },
}

/// A CIDR network: base address plus mask length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Network {
    address: IpAddr,
    prefix_len: u8,
}

impl Network {
    /// Parses a network literal of either family.
    ///
    /// A bare address is accepted as a host-length network.
    ///
    /// # Examples
    ///
    /// ```
    /// use byteworld_core::Network;
    ///
    /// let net = Network::parse("198.51.100.0/24").unwrap();
    /// assert_eq!(net.prefix_len(), 24);
    /// assert!(Network::parse("10.0.0.0/99").is_err());
    /// assert!(Network::parse("10.0.0.1/24").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`NetError`] if the address, the mask length, or the host
    /// bits are invalid.
    pub fn parse(input: &str) -> Result<Self, NetError> {
        let (address_part, len_part) = match input.split_once('/') {
            Some((address, len)) => (address, Some(len)),
            None => (input, None),
        };

        let address: IpAddr = address_part.parse().map_err(|_| NetError::InvalidAddress {
            input: input.to_string(),
        })?;
        let max = AddressFamily::of(&address).max_prefix_len();

        let prefix_len = match len_part {
            None => max,
            Some(len) => parse_prefix_len(len)
                .filter(|len| *len <= max)
                .ok_or_else(|| NetError::InvalidPrefixLength {
                    input: input.to_string(),
                    max,
                })?,
        };

        if !host_bits_clear(address, prefix_len) {
            return Err(NetError::HostBitsSet {
                input: input.to_string(),
            });
        }

        Ok(Self {
            address,
            prefix_len,
        })
    }

    /// Parses a network literal that must belong to `family`.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::FamilyMismatch`] for a well-formed literal of the
    /// other family, or any error [`Network::parse`] would return.
    pub fn parse_in(input: &str, family: AddressFamily) -> Result<Self, NetError> {
        let network = Self::parse(input)?;
        if network.family() == family {
            Ok(network)
        } else {
            Err(NetError::FamilyMismatch {
                input: input.to_string(),
                expected: family,
            })
        }
    }

    /// Returns the mask length.
    #[must_use]
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Returns the address family.
    #[must_use]
    pub const fn family(&self) -> AddressFamily {
        AddressFamily::of(&self.address)
    }
}

impl FromStr for Network {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

/// Parses a host address that must belong to `family`.
///
/// Network notation is rejected: `192.0.2.1` is a host, `192.0.2.1/32` is not.
///
/// # Errors
///
/// Returns [`NetError::InvalidAddress`] if the text is not an address, or
/// [`NetError::FamilyMismatch`] if it belongs to the other family.
pub fn parse_host(input: &str, family: AddressFamily) -> Result<IpAddr, NetError> {
    let address: IpAddr = input.parse().map_err(|_| NetError::InvalidAddress {
        input: input.to_string(),
    })?;

    if AddressFamily::of(&address) == family {
        Ok(address)
    } else {
        Err(NetError::FamilyMismatch {
            input: input.to_string(),
            expected: family,
        })
    }
}

fn parse_prefix_len(text: &str) -> Option<u8> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn host_bits_clear(address: IpAddr, prefix_len: u8) -> bool {
    match address {
        IpAddr::V4(v4) => {
            let host_mask = u32::MAX.checked_shr(u32::from(prefix_len)).unwrap_or(0);
            u32::from(v4) & host_mask == 0
        }
        IpAddr::V6(v6) => {
            let host_mask = u128::MAX.checked_shr(u32::from(prefix_len)).unwrap_or(0);
            u128::from(v6) & host_mask == 0
        }
    }
}
