//! Lookup command implementation.

use anyhow::Result;
use byteworld_registry::LookupService;
use clap::{Args, Subcommand};
use serde::Serialize;

use super::RegistryArgs;

/// Arguments for the lookup command.
#[derive(Args)]
pub struct LookupArgs {
    #[command(subcommand)]
    pub query: LookupQuery,
}

/// What to look up.
#[derive(Subcommand)]
pub enum LookupQuery {
    /// Look up an ASN record
    Asn {
        /// ASN identifier, e.g. 65000
        asn: String,
    },

    /// Look up a prefix record
    Prefix {
        /// Address family (ipv4, ipv6)
        family: String,

        /// Prefix in CIDR notation
        prefix: String,
    },

    /// List the services of one category
    Services {
        /// Service category (dns, ntp, cdn)
        category: String,
    },
}

/// Runs the lookup command, printing the result as JSON.
pub fn run(registry: &RegistryArgs, args: &LookupArgs) -> Result<()> {
    let lookup = LookupService::new(registry.load()?);
    println!("{}", answer(&lookup, &args.query)?);
    Ok(())
}

fn answer(lookup: &LookupService, query: &LookupQuery) -> Result<String> {
    match query {
        LookupQuery::Asn { asn } => to_json(&lookup.asn(asn)?),
        LookupQuery::Prefix { family, prefix } => to_json(&lookup.prefix(family, prefix)?),
        LookupQuery::Services { category } => to_json(&lookup.services(category)?),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteworld_registry::LookupError;
    use byteworld_test::RegistryFixture;

    fn sample() -> (RegistryFixture, LookupService) {
        let fixture = RegistryFixture::sample().unwrap();
        let registry = RegistryArgs {
            root: fixture.root().to_path_buf(),
            layout: None,
        };
        let lookup = LookupService::new(registry.load().unwrap());
        (fixture, lookup)
    }

    #[test]
    fn test_answer_asn() {
        let (_fixture, lookup) = sample();
        let json = answer(&lookup, &LookupQuery::Asn { asn: "65001".to_string() }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["org"], "Other Org");
    }

    #[test]
    fn test_answer_services() {
        let (_fixture, lookup) = sample();
        let json = answer(
            &lookup,
            &LookupQuery::Services {
                category: "cdn".to_string(),
            },
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["type"], "regional");
    }

    #[test]
    fn test_answer_bad_prefix() {
        let (_fixture, lookup) = sample();
        let err = answer(
            &lookup,
            &LookupQuery::Prefix {
                family: "ipv4".to_string(),
                prefix: "10.0.0.0/99".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LookupError>(),
            Some(LookupError::BadInput { .. })
        ));
    }
}
