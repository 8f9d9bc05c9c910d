//! Error types for the literal CLI.

use std::{env::VarError, io, path::PathBuf, process::ExitCode, result::Result as StdResult};

use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for literal operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors that can occur while running the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// Home directory resolution failed.
    #[error("Failed to resolve the home directory.")]
    HomeDirMissing,
    /// The configuration file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: TomlError,
    },
    /// A configured path could not be expanded.
    #[error("Invalid path in config: {path}: {source}")]
    PathExpansion {
        /// Input path that failed to expand.
        path: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<VarError>,
    },
    /// A configured URL could not be parsed.
    #[error("Invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL.
        url: String,
    },
    /// The credential file could not be written.
    #[error("Failed to write credentials at {path}: {source}")]
    CredentialWrite {
        /// Path to the credential file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The credential could not be serialized.
    #[error("Failed to serialize credentials: {source}")]
    CredentialSerialize {
        /// Underlying serialization error.
        source: serde_json::Error,
    },
    /// A token contained characters that cannot be sent in a header.
    #[error("Stored token is not a valid header value.")]
    InvalidToken,
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {source}")]
    ClientBuild {
        /// Underlying client error.
        source: reqwest::Error,
    },
    /// A request could not be sent or its body could not be read.
    #[error("Request `{operation}` failed: {source}")]
    Http {
        /// Operation or URL the request was for.
        operation: String,
        /// Underlying transport error.
        source: reqwest::Error,
    },
    /// A response body was not the expected JSON envelope.
    #[error("Unexpected response for `{operation}`: {message}")]
    ResponseDecode {
        /// Operation the response belongs to.
        operation: String,
        /// Error message describing the decode failure.
        message: String,
    },
    /// A successful response did not carry the expected payload.
    #[error("Response for `{operation}` is missing `{field}`")]
    MissingField {
        /// Operation the response belongs to.
        operation: String,
        /// Missing field name.
        field: String,
    },
    /// Login was rejected at the transport level.
    #[error("Login failed with status code {status}\nResponse: {body}")]
    LoginRejected {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// Login returned application-level errors.
    #[error("Login failed: {}", .messages.join("; "))]
    LoginErrors {
        /// Error messages reported by the service.
        messages: Vec<String>,
    },
    /// A request was rejected at the transport level.
    #[error("Request `{operation}` failed with status code {status}\nResponse: {body}")]
    RequestFailed {
        /// Operation that failed.
        operation: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// A request returned application-level errors.
    #[error("Request `{operation}` failed: {}", .messages.join("; "))]
    RequestErrors {
        /// Operation that failed.
        operation: String,
        /// Error messages reported by the service.
        messages: Vec<String>,
    },
    /// An interactive prompt was interrupted or canceled.
    #[error("Prompt canceled.")]
    PromptCanceled,
    /// An interactive prompt failed.
    #[error("Prompt failed: {message}")]
    PromptFailed {
        /// Error message describing the prompt failure.
        message: String,
    },
}

impl Error {
    /// Map errors to exit codes for CLI termination.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}
