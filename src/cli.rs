//! CLI parsing and command dispatch.

use clap::{Parser, Subcommand, ValueEnum};

use crate::{commands, error::Result};

/// Parsed command line arguments.
#[derive(Debug, Parser)]
#[command(name = "literal", version, about = "Command-line client for Literal.club")]
struct Cli {
    /// Control colored output.
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,
    /// Print requests, responses and credential handling details.
    #[arg(long, global = true)]
    debug: bool,
    /// Command to execute (defaults to reading).
    #[command(subcommand)]
    command: Option<Command>,
}

/// Supported color output modes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    /// Only colorize when stdout is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

// Commands are ordered alphabetically - maintain this order.
/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Create a book record, uploading a cover image.
    CreateBook,
    /// Log in again and replace the stored token.
    Login,
    /// List the mutations the Literal API offers.
    Mutations,
    /// Show the books you are currently reading.
    #[command(alias = "ls")]
    Reading,
}

/// Run the requested command.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let color = cli.color.into_choice();

    // Match arms are ordered alphabetically - maintain this order.
    match cli.command.unwrap_or(Command::Reading) {
        Command::CreateBook => commands::create_book::run(color, cli.debug).await,
        Command::Login => commands::login::run(color, cli.debug).await,
        Command::Mutations => commands::mutations::run(color, cli.debug).await,
        Command::Reading => commands::reading::run(color, cli.debug).await,
    }
}

impl ColorMode {
    /// Convert a CLI color mode into a color choice.
    fn into_choice(self) -> commands::ColorChoice {
        match self {
            Self::Auto => commands::ColorChoice::Auto,
            Self::Always => commands::ColorChoice::Always,
            Self::Never => commands::ColorChoice::Never,
        }
    }
}
