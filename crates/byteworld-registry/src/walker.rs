//! Record file enumeration.
//!
//! The walker turns a [`RegistryLayout`] into a lazy sequence of record
//! sources. Each category root is traversed in lexical path order, so a given
//! tree always yields its files in the same order and violation reports are
//! reproducible. Roots that do not exist are skipped; a registry may omit
//! whole categories.

use std::path::{Path, PathBuf};

use byteworld_core::Category;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{CategoryRoot, RegistryLayout};
use crate::error::WalkError;

/// The raw text of one record file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSource {
    /// Category of the root the file was found under.
    pub category: Category,
    /// Path of the file.
    pub path: PathBuf,
    /// File contents.
    pub contents: String,
}

impl RecordSource {
    /// Creates a record source from in-memory contents.
    pub fn new(category: Category, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            category,
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Enumerates the record files of a registry layout.
#[derive(Debug, Clone, Copy)]
pub struct RegistryWalker<'a> {
    layout: &'a RegistryLayout,
}

impl<'a> RegistryWalker<'a> {
    /// Creates a walker over `layout`.
    #[must_use]
    pub const fn new(layout: &'a RegistryLayout) -> Self {
        Self { layout }
    }

    /// Starts a fresh traversal.
    ///
    /// Files are read as the sequence is consumed. Traversal and read
    /// failures are yielded in place of the affected file and do not end the
    /// sequence.
    pub fn walk(&self) -> impl Iterator<Item = Result<RecordSource, WalkError>> + 'a {
        let layout = self.layout;
        layout
            .roots()
            .iter()
            .filter(|root| root_present(root))
            .flat_map(move |root| {
                WalkDir::new(&root.path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(move |entry| match entry {
                        Ok(entry) => (entry.file_type().is_file()
                            && layout.is_record_file(entry.path()))
                        .then(|| read_source(root.category, entry.into_path())),
                        Err(source) => Some(Err(WalkError::Traverse {
                            category: root.category,
                            path: source
                                .path()
                                .map_or_else(|| root.path.clone(), Path::to_path_buf),
                            source,
                        })),
                    })
            })
    }
}

fn root_present(root: &CategoryRoot) -> bool {
    if !root.path.exists() {
        debug!(category = %root.category, path = %root.path.display(), "Skipping absent category root");
        return false;
    }
    if !root.path.is_dir() {
        warn!(category = %root.category, path = %root.path.display(), "Category root is not a directory, skipping");
        return false;
    }
    true
}

fn read_source(category: Category, path: PathBuf) -> Result<RecordSource, WalkError> {
    debug!(%category, file = %path.display(), "Reading record");
    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(RecordSource {
            category,
            path,
            contents,
        }),
        Err(source) => Err(WalkError::Read {
            category,
            path,
            source,
        }),
    }
}
