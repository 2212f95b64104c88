//! # Byte World API
//!
//! HTTP binding of the Byte World registry lookup surface.
//!
//! | Route | Answer |
//! |---|---|
//! | `GET /asn/{asn}` | ASN record, or 404 |
//! | `GET /prefix/{family}/{prefix}` | prefix record, 400 for a malformed prefix, or 404 |
//! | `GET /ipv4/{prefix}`, `GET /ipv6/{prefix}` | same, family fixed by the path |
//! | `GET /services/{type}` | ordered service entries, or 404 |
//! | `GET /stats` | per-category counts |
//! | `GET /metrics` | Prometheus exposition text |
//! | `GET /` | welcome message and endpoint list |
//!
//! Errors are JSON objects with a single `detail` field. Lookups with a
//! well-formed argument answer 503 while no registry snapshot is published.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod routes;
mod server;

pub use error::ApiError;
pub use routes::{router, AppState, ENDPOINTS};
pub use server::{serve, shutdown_signal};
