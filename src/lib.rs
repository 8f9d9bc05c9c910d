#![warn(missing_docs)]
//! Library support for the literal CLI.

/// Book values, reading list and book creation.
mod books;
/// Command-line interface wiring and dispatch.
mod cli;
/// Command implementations.
mod commands;
/// Configuration loading.
mod config;
/// Credential persistence and login lifecycle.
mod credentials;
/// Debug traces, warnings and failure output.
mod diagnostics;
/// Error handling for the crate.
mod error;
/// Authenticated request gateway.
mod gateway;
/// GraphQL operation documents.
mod operations;
/// Color palette and styling for CLI output.
mod palette;
/// Path expansion and normalization utilities.
mod paths;
/// Interactive input providers.
mod prompt;
/// Test fixtures and scripted input.
#[cfg(test)]
mod testutil;

pub use crate::error::{Error, Result};

/// Run the CLI, returning a structured error on failure.
pub async fn run() -> Result<()> {
    cli::run().await
}
