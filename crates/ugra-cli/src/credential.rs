//! # Credential Subcommand
//!
//! Verifiable Credential wire-shape operations.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use ugra_vc::VerifiableCredential;

use crate::Report;

/// Arguments for the credential subcommand.
#[derive(Args, Debug)]
pub struct CredentialArgs {
    #[command(subcommand)]
    pub command: CredentialCommand,
}

#[derive(Subcommand, Debug)]
pub enum CredentialCommand {
    /// Decode a credential, check its structure, and print it in canonical
    /// wire shape.
    Normalize {
        credential: PathBuf,
        /// Print on one line.
        #[arg(long)]
        compact: bool,
    },
}

/// Run a credential subcommand.
pub fn run(args: &CredentialArgs) -> anyhow::Result<Report> {
    match &args.command {
        CredentialCommand::Normalize {
            credential,
            compact,
        } => normalize(credential, *compact),
    }
}

fn normalize(path: &Path, compact: bool) -> anyhow::Result<Report> {
    let raw = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let credential = VerifiableCredential::from_slice(&raw)
        .with_context(|| format!("invalid credential {}", path.display()))?;
    credential.validate()?;
    tracing::debug!(
        types = credential.types.len(),
        proofs = credential.proof.len(),
        "normalized credential"
    );

    let output = if compact {
        serde_json::to_string(&credential)?
    } else {
        serde_json::to_string_pretty(&credential)?
    };
    Ok(Report::ok(output))
}
