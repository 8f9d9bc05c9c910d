//! Credential persistence and the login lifecycle.
//!
//! [`CredentialStore::get_usable`] is the single entry point commands use: it
//! reuses a stored token when the probe accepts it and falls back to an
//! interactive login otherwise.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    diagnostics::Diagnostics,
    error::{Error, Result},
    gateway::{Gateway, Outcome, error_messages},
    operations::{LOGIN, PROBE},
    paths::display_path,
    prompt::Prompter,
};

/// A bearer token and the profile it belongs to.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Opaque bearer token.
    pub token: String,
    /// Identifier of the authenticated profile.
    #[serde(alias = "accountId")]
    pub profile_id: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("profile_id", &self.profile_id)
            .finish()
    }
}

/// Payload of a successful login.
#[derive(Debug, Deserialize)]
struct LoginPayload {
    /// Issued bearer token.
    token: String,
    /// Profile of the logged-in account.
    profile: ProfileRef,
}

/// Minimal profile reference.
#[derive(Debug, Deserialize)]
struct ProfileRef {
    /// Profile identifier.
    id: String,
}

/// Owner of the credential file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    /// Location of the credential file.
    path: PathBuf,
    /// Output sink.
    diagnostics: Diagnostics,
}

impl CredentialStore {
    /// Create a store for the credential file at `path`.
    pub fn new(path: PathBuf, diagnostics: Diagnostics) -> Self {
        Self { path, diagnostics }
    }

    /// Read the stored credential, treating any failure as absence.
    pub fn load(&self) -> Option<Credential> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) => {
                self.diagnostics.debug(format!(
                    "no usable credential file at {}: {error}",
                    display_path(&self.path)
                ));
                return None;
            }
        };

        match serde_json::from_str::<Credential>(&contents) {
            Ok(credential) => {
                self.diagnostics
                    .debug(format!("loaded credential from {}", display_path(&self.path)));
                Some(credential)
            }
            Err(error) => {
                self.diagnostics
                    .debug(format!("ignoring credential file: {error}"));
                None
            }
        }
    }

    /// Check a credential with the probe operation.
    ///
    /// Only the transport status is consulted: a 200 response carrying an
    /// `errors` list still counts as valid.
    pub async fn validate(&self, gateway: &Gateway, credential: &Credential) -> bool {
        match gateway
            .send(&PROBE, json!({}), Some(&credential.token))
            .await
        {
            Ok(Outcome::TransportFailure { .. }) => {
                self.diagnostics.note("Token is invalid");
                false
            }
            Ok(_) => {
                self.diagnostics.debug("token is valid");
                true
            }
            Err(error) => {
                self.diagnostics.debug(format!("probe failed: {error}"));
                false
            }
        }
    }

    /// Ask for credentials and exchange them for a token.
    pub async fn interactive_login(
        &self,
        gateway: &Gateway,
        prompter: &mut dyn Prompter,
    ) -> Result<Credential> {
        let input = prompter.request_credentials()?;
        let variables = json!({
            "email": input.email,
            "password": input.password,
        });

        match gateway.send(&LOGIN, variables, None).await? {
            Outcome::Success(payload) => parse_login(payload),
            Outcome::TransportFailure { status, body } => {
                Err(Error::LoginRejected { status, body })
            }
            Outcome::ApplicationFailure(errors) => Err(Error::LoginErrors {
                messages: error_messages(&errors),
            }),
        }
    }

    /// Write the credential and restrict it to its owner.
    pub fn persist(&self, credential: &Credential) -> Result<()> {
        let contents = serde_json::to_string(credential)
            .map_err(|source| Error::CredentialSerialize { source })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| Error::CredentialWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        write_private(&self.path, contents.as_bytes()).map_err(|source| {
            Error::CredentialWrite {
                path: self.path.clone(),
                source,
            }
        })?;

        self.diagnostics
            .debug(format!("saved credential to {}", display_path(&self.path)));
        Ok(())
    }

    /// Return a credential that passed the probe, logging in when needed.
    pub async fn get_usable(
        &self,
        gateway: &Gateway,
        prompter: &mut dyn Prompter,
    ) -> Result<Credential> {
        if let Some(credential) = self.load()
            && self.validate(gateway, &credential).await
        {
            return Ok(credential);
        }
        self.refresh(gateway, prompter).await
    }

    /// Log in unconditionally and persist the new credential.
    ///
    /// A failed write is reported as a warning; the credential is still
    /// returned for use in this run.
    pub async fn refresh(
        &self,
        gateway: &Gateway,
        prompter: &mut dyn Prompter,
    ) -> Result<Credential> {
        let credential = self.interactive_login(gateway, prompter).await?;
        if let Err(error) = self.persist(&credential) {
            self.diagnostics
                .warn(format!("Could not save token: {error}"));
        }
        Ok(credential)
    }
}

/// Extract the credential from a login payload.
fn parse_login(payload: Value) -> Result<Credential> {
    let login: LoginPayload =
        serde_json::from_value(payload).map_err(|error| Error::ResponseDecode {
            operation: LOGIN.name.to_string(),
            message: error.to_string(),
        })?;
    Ok(Credential {
        token: login.token,
        profile_id: login.profile.id,
    })
}

/// Write `contents` to a file readable and writable only by its owner.
///
/// New files are created with mode 0600. An existing file keeps its inode, so
/// its mode is tightened before the secret is written.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::{
        fs::OpenOptions,
        io::Write,
        os::unix::fs::{OpenOptionsExt, PermissionsExt},
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

/// Write `contents` to the credential file.
#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::write(path, contents)
}
