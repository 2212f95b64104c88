//! Canned record documents.
//!
//! Each helper renders the YAML text of one record file, in the layout the
//! registry expects on disk.

/// A service entry for [`services_yaml`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceEntry<'a> {
    /// Value of the `type` key; omitted when `None`.
    pub sub_type: Option<&'a str>,
    /// Value of the `ipv4` key; omitted when `None`.
    pub ipv4: Option<&'a str>,
    /// Value of the `ipv6` key; omitted when `None`.
    pub ipv6: Option<&'a str>,
    /// Value of the `name` key; omitted when `None`.
    pub name: Option<&'a str>,
}

impl<'a> ServiceEntry<'a> {
    /// Creates an entry with the given sub-type and no addresses.
    #[must_use]
    pub fn of_type(sub_type: &'a str) -> Self {
        Self {
            sub_type: Some(sub_type),
            ..Self::default()
        }
    }

    /// Sets the IPv4 host address.
    #[must_use]
    pub const fn ipv4(mut self, address: &'a str) -> Self {
        self.ipv4 = Some(address);
        self
    }

    /// Sets the IPv6 host address.
    #[must_use]
    pub const fn ipv6(mut self, address: &'a str) -> Self {
        self.ipv6 = Some(address);
        self
    }

    /// Sets the display name.
    #[must_use]
    pub const fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }
}

/// Renders an ASN record with an integer identifier.
///
/// ```
/// let yaml = byteworld_test::asn_yaml(65000, "X", "a@x", "198.51.100.0/24", "2001:db8::/32");
/// assert!(yaml.contains("asn: 65000"));
/// ```
#[must_use]
pub fn asn_yaml(asn: u64, org: &str, contact: &str, ipv4: &str, ipv6: &str) -> String {
    format!("asn: {asn}\norg: \"{org}\"\ncontact: \"{contact}\"\nipv4: \"{ipv4}\"\nipv6: \"{ipv6}\"\n")
}

/// Renders a prefix record keyed by its family (`ipv4` or `ipv6`).
#[must_use]
pub fn prefix_yaml(family: &str, prefix: &str, description: &str) -> String {
    format!("{family}: \"{prefix}\"\ndescription: \"{description}\"\n")
}

/// Renders a services file holding `entries`.
#[must_use]
pub fn services_yaml(entries: &[ServiceEntry<'_>]) -> String {
    let mut yaml = String::from("services:\n");
    for entry in entries {
        let mut fields = Vec::new();
        if let Some(name) = entry.name {
            fields.push(format!("name: \"{name}\""));
        }
        if let Some(sub_type) = entry.sub_type {
            fields.push(format!("type: \"{sub_type}\""));
        }
        if let Some(ipv4) = entry.ipv4 {
            fields.push(format!("ipv4: \"{ipv4}\""));
        }
        if let Some(ipv6) = entry.ipv6 {
            fields.push(format!("ipv6: \"{ipv6}\""));
        }
        if fields.is_empty() {
            yaml.push_str("  - {}\n");
            continue;
        }
        for (i, field) in fields.iter().enumerate() {
            let marker = if i == 0 { "  - " } else { "    " };
            yaml.push_str(marker);
            yaml.push_str(field);
            yaml.push('\n');
        }
    }
    yaml
}
