//! Registry tree layout configuration.

use std::path::{Path, PathBuf};

use byteworld_core::Category;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// A directory whose record files all belong to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRoot {
    /// Category of every record under the root.
    pub category: Category,
    /// Root directory.
    pub path: PathBuf,
}

/// Where a registry's records live and how they are named.
///
/// Each root is tagged with its category when the layout is built, so the
/// category of a record never depends on the text of its path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryLayout {
    /// Category roots, traversed in order.
    #[serde(default)]
    pub roots: Vec<CategoryRoot>,

    /// Extension carried by record files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    RegistryLayout::DEFAULT_EXTENSION.to_string()
}

impl Default for RegistryLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryLayout {
    /// Extension of record files unless configured otherwise.
    pub const DEFAULT_EXTENSION: &'static str = "yml";

    /// Creates a layout with no roots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            extension: default_extension(),
        }
    }

    /// Creates the conventional layout under `base`.
    ///
    /// # Examples
    ///
    /// ```
    /// use byteworld_core::Category;
    /// use byteworld_registry::RegistryLayout;
    ///
    /// let layout = RegistryLayout::standard("/srv/registry");
    /// let asn = &layout.roots[0];
    /// assert_eq!(asn.category, Category::Asn);
    /// assert!(asn.path.ends_with("registry/asn"));
    /// ```
    #[must_use]
    pub fn standard(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self::new()
            .with_root(Category::Asn, base.join("registry").join("asn"))
            .with_root(Category::Ipv4, base.join("registry").join("ipv4"))
            .with_root(Category::Ipv6, base.join("registry").join("ipv6"))
            .with_root(Category::Services, base.join("services"))
    }

    /// Adds a category root.
    #[must_use]
    pub fn with_root(mut self, category: Category, path: impl Into<PathBuf>) -> Self {
        self.roots.push(CategoryRoot {
            category,
            path: path.into(),
        });
        self
    }

    /// Sets the record extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Reads a layout from a YAML file.
    ///
    /// Relative root paths are resolved against the directory holding the
    /// layout file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a layout document.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::LayoutRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut layout: Self =
            serde_yaml::from_str(&content).map_err(|source| RegistryError::LayoutParse {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for root in &mut layout.roots {
            if root.path.is_relative() {
                root.path = base.join(&root.path);
            }
        }
        Ok(layout)
    }

    /// Returns the category roots.
    #[must_use]
    pub fn roots(&self) -> &[CategoryRoot] {
        &self.roots
    }

    /// Returns true if `path` carries the record extension.
    #[must_use]
    pub fn is_record_file(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == self.extension.as_str())
    }
}
