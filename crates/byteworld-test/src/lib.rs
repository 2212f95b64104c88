//! # Byte World Test
//!
//! Fixtures for testing code that loads Byte World registry trees.
//!
//! - [`RegistryFixture`] - a registry tree in a temporary directory
//! - [`asn_yaml`], [`prefix_yaml`], [`services_yaml`] - canned record documents
//!
//! ## Example
//!
//! ```rust
//! use byteworld_test::{services_yaml, RegistryFixture, ServiceEntry};
//!
//! let fixture = RegistryFixture::sample().unwrap();
//! fixture
//!     .services("cdn", &services_yaml(&[ServiceEntry::of_type("experimental")]))
//!     .unwrap();
//! ```

pub mod fixture;
pub mod records;

pub use fixture::RegistryFixture;
pub use records::{asn_yaml, prefix_yaml, services_yaml, ServiceEntry};
