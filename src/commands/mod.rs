//! CLI command implementations.

use std::io::{self, IsTerminal};

use crate::{
    config::Config, credentials::CredentialStore, diagnostics::Diagnostics, error::Result,
    gateway::Gateway,
};

/// Output color handling selection.
#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    /// Colorize only when output is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

impl ColorChoice {
    /// Determine whether color output should be enabled.
    pub(crate) fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Everything a command needs to talk to the service.
#[derive(Debug)]
pub struct Context {
    /// Resolved configuration.
    pub config: Config,
    /// Output sink.
    pub diagnostics: Diagnostics,
    /// Request gateway.
    pub gateway: Gateway,
    /// Credential file owner.
    pub store: CredentialStore,
}

impl Context {
    /// Load the config and wire up the gateway and credential store.
    pub(crate) fn load(color: ColorChoice, debug: bool) -> Result<Self> {
        let config = Config::load(debug)?;
        let diagnostics = Diagnostics::new(config.debug, color.enabled());
        Self::new(config, diagnostics)
    }

    /// Wire up the gateway and credential store for an explicit config.
    pub(crate) fn new(config: Config, diagnostics: Diagnostics) -> Result<Self> {
        diagnostics.debug(format!("endpoint: {}", config.endpoint));
        let gateway = Gateway::new(&config, diagnostics)?;
        let store = CredentialStore::new(config.token_path.clone(), diagnostics);
        Ok(Self {
            config,
            diagnostics,
            gateway,
            store,
        })
    }
}

// Command modules are ordered alphabetically - maintain this order.
/// Create-book command implementation.
pub mod create_book;
/// Login command implementation.
pub mod login;
/// Mutations command implementation.
pub mod mutations;
/// Reading list command implementation.
pub mod reading;
