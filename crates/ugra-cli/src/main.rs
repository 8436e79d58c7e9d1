//! # ugra CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;
use ugra_cli::Report;

/// ugradid CLI: credential schemas and Verifiable Credentials.
#[derive(Parser, Debug)]
#[command(name = "ugra", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Build, check, diff and validate credential schemas.
    Schema(ugra_cli::schema::SchemaArgs),
    /// Verifiable Credential operations.
    Credential(ugra_cli::credential::CredentialArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Report { output, success } = match &cli.command {
        Commands::Schema(args) => ugra_cli::schema::run(args)?,
        Commands::Credential(args) => ugra_cli::credential::run(args)?,
    };

    println!("{output}");
    if !success {
        std::process::exit(1);
    }
    Ok(())
}
