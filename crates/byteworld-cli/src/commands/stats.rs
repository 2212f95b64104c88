//! Stats command implementation.

use anyhow::Result;
use byteworld_registry::LookupService;

use super::RegistryArgs;

/// Runs the stats command, printing per-category counts as JSON.
pub fn run(registry: &RegistryArgs) -> Result<()> {
    let stats = LookupService::new(registry.load()?).stats()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteworld_test::RegistryFixture;

    #[test]
    fn test_stats_on_sample() {
        let fixture = RegistryFixture::sample().unwrap();
        let registry = RegistryArgs {
            root: fixture.root().to_path_buf(),
            layout: None,
        };
        assert!(run(&registry).is_ok());
    }
}
