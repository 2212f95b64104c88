//! # Byte World Core
//!
//! Core types for the Byte World network-resource registry.
//!
//! This crate provides the data model shared by every other Byte World crate:
//!
//! - [`Category`], [`AddressFamily`], [`ServiceCategory`] - registry partitions
//!   and the closed service sub-type enumerations
//! - [`AsnRecord`], [`PrefixRecord`], [`ServiceRecord`], [`Entity`] - validated
//!   registry entities
//! - [`Network`], [`parse_host`] - network and host literal parsing
//! - [`Violation`], [`Violations`] - the consistency violation taxonomy
//! - [`RegistryStats`] - per-category counts of a published snapshot
//!
//! ## Example
//!
//! ```rust
//! use byteworld_core::{AddressFamily, Network, ServiceCategory};
//!
//! let net = Network::parse_in("198.51.100.0/24", AddressFamily::V4).unwrap();
//! assert_eq!(net.prefix_len(), 24);
//!
//! let dns: ServiceCategory = "dns".parse().unwrap();
//! assert!(dns.accepts("authoritative"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod category;
pub mod entity;
pub mod error;
pub mod net;
pub mod stats;
pub mod validation;


pub use category::{AddressFamily, Category, ServiceCategory};
pub use entity::{AsnId, AsnRecord, Entity, Metadata, PrefixRecord, ServiceRecord};
pub use error::{Error, Result};
pub use net::{parse_host, NetError, Network};
pub use stats::RegistryStats;
pub use validation::{Violation, ViolationKind, Violations};
