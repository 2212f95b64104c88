//! Registry violation taxonomy.
//!
//! A [`Violation`] describes one reason a registry tree cannot be published.
//! Validation collects every violation across the whole tree into
//! [`Violations`] instead of stopping at the first one.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::category::Category;

/// One invariant violated by a registry tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The kind of invariant violated.
    pub kind: ViolationKind,
    /// Category of the offending record.
    pub category: Category,
    /// File holding the offending record.
    pub file: PathBuf,
    /// Field at fault, if the violation concerns one field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// The other file involved in a duplicate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_file: Option<PathBuf>,
}

impl Violation {
    /// Creates a new violation.
    ///
    /// # Examples
    ///
    /// ```
    /// use byteworld_core::{Category, Violation, ViolationKind};
    ///
    /// let violation = Violation::new(
    ///     ViolationKind::MalformedPrefix,
    ///     Category::Asn,
    ///     "registry/asn/as65000.yml",
    ///     "'10.0.0.0/99' has an invalid prefix length (maximum 32)",
    /// )
    /// .with_field("ipv4");
    /// assert_eq!(violation.field.as_deref(), Some("ipv4"));
    /// ```
    pub fn new(
        kind: ViolationKind,
        category: Category,
        file: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category,
            file: file.into(),
            field: None,
            message: message.into(),
            conflicting_file: None,
        }
    }

    /// Creates a violation for a record that could not be decoded.
    pub fn decode(category: Category, file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::DecodeError, category, file, message)
    }

    /// Creates a violation for a required field that is absent.
    pub fn missing_field(category: Category, file: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("'{field}' is required but was not provided"),
            field: Some(field),
            ..Self::new(ViolationKind::MissingField, category, file, String::new())
        }
    }

    /// Creates a violation for an identity or allocation claimed twice.
    ///
    /// `kind` is [`ViolationKind::DuplicateKey`] for ASN identities and
    /// [`ViolationKind::DuplicateAllocation`] for prefixes.
    pub fn duplicate(
        kind: ViolationKind,
        category: Category,
        file: impl Into<PathBuf>,
        field: impl Into<String>,
        value: &str,
        first_seen: &Path,
    ) -> Self {
        let field = field.into();
        Self {
            message: format!(
                "{field} {value} is already allocated in {}",
                first_seen.display()
            ),
            field: Some(field),
            conflicting_file: Some(first_seen.to_path_buf()),
            ..Self::new(kind, category, file, String::new())
        }
    }

    /// Attaches the field at fault.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.kind,
            self.category,
            self.file.display(),
            self.message
        )
    }
}

impl std::error::Error for Violation {}

/// The invariant a [`Violation`] breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The record is unparseable or has the wrong shape.
    DecodeError,
    /// A required field is absent.
    MissingField,
    /// A network literal does not parse.
    MalformedPrefix,
    /// A host address literal does not parse.
    MalformedAddress,
    /// An ASN identity appears in more than one record.
    DuplicateKey,
    /// A prefix is allocated more than once.
    DuplicateAllocation,
    /// A service sub-type is outside its category's enumeration.
    InvalidSubtype,
    /// A services file names no known category.
    UnknownCategory,
}

impl ViolationKind {
    /// Returns the snake-case name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DecodeError => "decode_error",
            Self::MissingField => "missing_field",
            Self::MalformedPrefix => "malformed_prefix",
            Self::MalformedAddress => "malformed_address",
            Self::DuplicateKey => "duplicate_key",
            Self::DuplicateAllocation => "duplicate_allocation",
            Self::InvalidSubtype => "invalid_subtype",
            Self::UnknownCategory => "unknown_category",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered collection of violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a violation.
    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Returns true if there are no violations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the number of violations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns an iterator over the violations.
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// Returns the violations of one kind.
    #[must_use]
    pub fn of_kind(&self, kind: ViolationKind) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.kind == kind).collect()
    }

}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<T: IntoIterator<Item = Violation>>(iter: T) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            write!(f, "no violations")
        } else if self.violations.len() == 1 {
            write!(f, "{}", self.violations[0])
        } else {
            writeln!(f, "{} violations:", self.violations.len())?;
            for violation in &self.violations {
                writeln!(f, "  - {violation}")?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for Violations {}
