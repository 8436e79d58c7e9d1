//! # ugra-cli — ugradid Command-Line Interface
//!
//! A thin clap front end over the library crates.
//!
//! ## Subcommands
//!
//! - `schema build` — compile a builder descriptor (JSON or YAML) to a schema
//! - `schema check` — meta-validate a schema
//! - `schema diff` — classify an update between two schema records
//! - `schema validate` — validate a document against a schema
//! - `credential normalize` — rewrite a credential in canonical wire shape
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from handlers.
//! - Handlers delegate to the domain crates and return their output as a
//!   [`Report`]; only `main` writes to stdout.

pub mod credential;
pub mod schema;

/// What a handler produced: text for stdout, and whether the command
/// succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub output: String,
    pub success: bool,
}

impl Report {
    pub fn ok(output: String) -> Self {
        Self {
            output,
            success: true,
        }
    }

    pub fn failed(output: String) -> Self {
        Self {
            output,
            success: false,
        }
    }
}
