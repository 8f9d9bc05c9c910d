//! Configuration loading.
//!
//! Everything the credential store and gateway need to know about their
//! environment lives in a [`Config`] value that is built once at startup.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use url::Url;

use crate::{
    error::{Error, Result},
    paths,
};

/// GraphQL endpoint of the Literal service.
pub const DEFAULT_ENDPOINT: &str = "https://literal.club/graphql/";

/// Base URL that uploaded cover keys are served from.
pub const DEFAULT_ASSET_BASE: &str = "https://assets.literal.club/";

/// Resolved configuration for a CLI run.
#[derive(Debug, Clone)]
pub struct Config {
    /// GraphQL endpoint every operation is posted to.
    pub endpoint: Url,
    /// Location of the persisted credential file.
    pub token_path: PathBuf,
    /// Base URL used to derive cover URLs from upload keys.
    pub asset_base: Url,
    /// Whether verbose diagnostics are printed.
    pub debug: bool,
}

/// Raw config file structure.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    /// Override for the GraphQL endpoint.
    endpoint: Option<String>,
    /// Override for the credential file location.
    token_file: Option<String>,
    /// Override for the cover asset base URL.
    asset_base: Option<String>,
}

impl Config {
    /// Build a config from explicit values.
    pub fn new(endpoint: Url, token_path: PathBuf, asset_base: Url, debug: bool) -> Self {
        Self {
            endpoint,
            token_path,
            asset_base,
            debug,
        }
    }

    /// Load the config from the default location, falling back to defaults.
    pub(crate) fn load(debug: bool) -> Result<Self> {
        let path = paths::default_config_path()?;
        let token_path = paths::default_token_path()?;
        Self::load_from(&path, token_path, debug)
    }

    /// Load a config file from an explicit path.
    ///
    /// A missing file yields the defaults; `default_token_path` is used unless
    /// the file overrides it.
    pub(crate) fn load_from(path: &Path, default_token_path: PathBuf, debug: bool) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|error| Error::ConfigParse {
                path: path.to_path_buf(),
                source: error,
            })?,
            Err(error) if error.kind() == ErrorKind::NotFound => RawConfig::default(),
            Err(error) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source: error,
                });
            }
        };

        let base_dir = path.parent().unwrap_or(Path::new("."));
        let token_path = match raw.token_file {
            Some(raw_path) => paths::expand_path(&raw_path, base_dir)?,
            None => default_token_path,
        };
        let endpoint = parse_url(raw.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;
        let asset_base = parse_url(raw.asset_base.as_deref().unwrap_or(DEFAULT_ASSET_BASE))?;

        Ok(Self::new(endpoint, token_path, asset_base, debug))
    }

    /// Derive the public URL of an uploaded cover from its storage key.
    pub fn cover_url(&self, key: &str) -> String {
        let base = self.asset_base.as_str().trim_end_matches('/');
        let key = key.trim_start_matches('/');
        format!("{base}/{key}")
    }
}

/// Parse a configured URL.
fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|_| Error::InvalidUrl {
        url: raw.to_string(),
    })
}
