//! Error types for Byte World core operations.
//!
//! This module defines the error types used throughout the `byteworld-core` crate.

use thiserror::Error;

use crate::net::NetError;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Byte World core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Name does not match any registry category.
    #[error("Unknown registry category: {name}")]
    UnknownCategory {
        /// The rejected name.
        name: String,
    },

    /// Name does not match any service category.
    #[error("Unknown service category: {name}")]
    UnknownServiceCategory {
        /// The rejected name.
        name: String,
    },

    /// Name does not match any address family.
    #[error("Unknown address family: {name}")]
    UnknownAddressFamily {
        /// The rejected name.
        name: String,
    },

    /// Network or host literal failed to parse.
    #[error(transparent)]
    Network(#[from] NetError),
}
