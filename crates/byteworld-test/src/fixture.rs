//! Temporary on-disk registry trees.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::records::{asn_yaml, prefix_yaml, services_yaml, ServiceEntry};

/// A registry tree in a temporary directory, removed on drop.
///
/// Files are placed in the standard layout: `registry/asn`, `registry/ipv4`,
/// `registry/ipv6` and `services`, each record with the `.yml` extension.
///
/// # Examples
///
/// ```
/// use byteworld_test::{asn_yaml, RegistryFixture};
///
/// let fixture = RegistryFixture::new().unwrap();
/// let path = fixture
///     .asn("as65000", &asn_yaml(65000, "X", "a@x", "198.51.100.0/24", "2001:db8::/32"))
///     .unwrap();
/// assert!(path.ends_with("registry/asn/as65000.yml"));
/// ```
#[derive(Debug)]
pub struct RegistryFixture {
    dir: TempDir,
}

impl RegistryFixture {
    /// Creates an empty tree. No category directory exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Creates a tree holding a small valid registry: two ASNs, their prefix
    /// records, and one file per service category.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be written.
    pub fn sample() -> io::Result<Self> {
        let fixture = Self::new()?;
        fixture.asn(
            "as65000",
            &asn_yaml(65000, "Example Org", "noc@example.net", "198.51.100.0/24", "2001:db8::/32"),
        )?;
        fixture.asn(
            "as65001",
            &asn_yaml(65001, "Other Org", "ops@other.example", "203.0.113.0/24", "2001:db8:1::/48"),
        )?;
        fixture.ipv4("198.51.100.0_24", &prefix_yaml("ipv4", "198.51.100.0/24", "Example Org"))?;
        fixture.ipv4("203.0.113.0_24", &prefix_yaml("ipv4", "203.0.113.0/24", "Other Org"))?;
        fixture.ipv6("2001_db8__32", &prefix_yaml("ipv6", "2001:db8::/32", "Example Org"))?;
        fixture.services(
            "dns",
            &services_yaml(&[
                ServiceEntry::of_type("authoritative")
                    .name("ns1")
                    .ipv4("198.51.100.53")
                    .ipv6("2001:db8::53"),
                ServiceEntry::of_type("anycast").name("resolver").ipv4("203.0.113.53"),
            ]),
        )?;
        fixture.services(
            "ntp",
            &services_yaml(&[ServiceEntry::of_type("stratum1").name("time1").ipv4("198.51.100.123")]),
        )?;
        fixture.services("cdn", &services_yaml(&[ServiceEntry::of_type("regional").name("edge-ams")]))?;
        Ok(fixture)
    }

    /// Returns the registry base directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` at `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parents cannot be written.
    pub fn write(&self, relative: impl AsRef<Path>, contents: &str) -> io::Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Creates an empty directory at `relative`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn mkdir(&self, relative: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Writes an ASN record file `registry/asn/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn asn(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        self.write(format!("registry/asn/{name}.yml"), contents)
    }

    /// Writes an IPv4 prefix record file `registry/ipv4/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn ipv4(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        self.write(format!("registry/ipv4/{name}.yml"), contents)
    }

    /// Writes an IPv6 prefix record file `registry/ipv6/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn ipv6(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        self.write(format!("registry/ipv6/{name}.yml"), contents)
    }

    /// Writes a services file `services/<category>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn services(&self, category: &str, contents: &str) -> io::Result<PathBuf> {
        self.write(format!("services/{category}.yml"), contents)
    }
}
