//! Byte World CLI - validate, query and serve a network-resource registry.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::{Cli, Commands, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output on stdout stays machine-readable.
    let json = matches!(cli.log_format, LogFormat::Json);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "byteworld=info".into()))
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    match cli.command {
        Commands::Validate(args) => commands::validate::run(&cli.registry, &args),
        Commands::Serve(args) => commands::serve::run(&cli.registry, &args).await,
        Commands::Lookup(args) => commands::lookup::run(&cli.registry, &args),
        Commands::Stats => commands::stats::run(&cli.registry),
        Commands::Version => {
            println!("byteworld {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
