//! # Byte World Registry
//!
//! Ingestion, consistency validation and lookup for the Byte World
//! network-resource registry.
//!
//! A registry is a tree of YAML records: one file per ASN, one file per IPv4
//! or IPv6 prefix, and one file per service category. This crate turns such a
//! tree into an immutable, queryable index, refusing to do so if any record is
//! malformed or conflicts with another.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use byteworld_registry::{LookupService, RegistryLayout, RegistryStore};
//!
//! let layout = RegistryLayout::standard("/srv/byteworld");
//! let store = Arc::new(RegistryStore::new());
//! store.reload(&layout)?;
//!
//! let lookup = LookupService::new(store);
//! let record = lookup.asn("65000")?;
//! println!("{} is held by {}", record.asn, record.org);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! RegistryLayout ──▶ RegistryWalker ──▶ decode ──▶ RegistryValidator
//!                                                        │
//!                                                        ▼
//!          LookupService ◀── RegistryStore ◀── RegistryIndex
//! ```
//!
//! Loading is synchronous and single-threaded. The resulting index is never
//! mutated; [`RegistryStore`] swaps whole indexes atomically so any number of
//! readers can query without locking.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod decoder;
mod error;
mod index;
mod lookup;
mod store;
mod validator;
mod walker;

pub use config::{CategoryRoot, RegistryLayout};
pub use decoder::{decode, AsnDraft, Document, PrefixDraft, ServiceDraft};
pub use error::{DecodeError, LookupError, RegistryError, WalkError};
pub use index::RegistryIndex;
pub use lookup::{LookupResult, LookupService};
pub use store::RegistryStore;
pub use validator::{validate, validate_sources, RegistryValidator};
pub use walker::{RecordSource, RegistryWalker};
