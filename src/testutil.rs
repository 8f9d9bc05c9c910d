//! Test utilities for exercising the gateway and credential store.
//!
//! Provides a scripted [`Prompter`] that records how often it was asked for
//! input, and helpers that point the gateway at a `wiremock` server.

use std::{collections::VecDeque, path::Path};

use serde_json::json;
use url::Url;
use wiremock::{MockServer, ResponseTemplate};

use crate::{
    books::{BookDraft, PhysicalFormat},
    commands::Context,
    config::Config,
    credentials::Credential,
    diagnostics::Diagnostics,
    error::{Error, Result},
    gateway::Gateway,
    prompt::{LoginInput, Prompter},
};

/// Asset base used by test configs.
pub const TEST_ASSET_BASE: &str = "https://assets.example.test/";

/// Prompter that answers from queued responses.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    /// Queued login answers.
    logins: VecDeque<LoginInput>,
    /// Queued book drafts.
    drafts: VecDeque<BookDraft>,
    /// Number of credential prompts issued.
    credential_requests: usize,
    /// Number of book prompts issued.
    book_requests: usize,
}

impl ScriptedPrompter {
    /// Create a prompter with no queued answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a login answer.
    pub fn with_login(mut self, email: &str, password: &str) -> Self {
        self.logins.push_back(LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        });
        self
    }

    /// Queue a book draft.
    pub fn with_draft(mut self, draft: BookDraft) -> Self {
        self.drafts.push_back(draft);
        self
    }

    /// How many times credentials were requested.
    pub fn credential_requests(&self) -> usize {
        self.credential_requests
    }

    /// How many times book fields were requested.
    pub fn book_requests(&self) -> usize {
        self.book_requests
    }
}

impl Prompter for ScriptedPrompter {
    fn request_credentials(&mut self) -> Result<LoginInput> {
        self.credential_requests += 1;
        self.logins.pop_front().ok_or(Error::PromptCanceled)
    }

    fn request_book_fields(&mut self) -> Result<BookDraft> {
        self.book_requests += 1;
        self.drafts.pop_front().ok_or(Error::PromptCanceled)
    }
}

/// Build a config whose endpoint is the mock server's `/graphql`.
pub fn config_for(server: &MockServer, dir: &Path) -> Config {
    let endpoint = Url::parse(&format!("{}/graphql", server.uri())).expect("endpoint url");
    let asset_base = Url::parse(TEST_ASSET_BASE).expect("asset url");
    Config::new(endpoint, dir.join("token.json"), asset_base, false)
}

/// Build a gateway that talks to the mock server.
pub fn gateway_for(server: &MockServer) -> Gateway {
    let config = config_for(server, Path::new("."));
    Gateway::new(&config, Diagnostics::default()).expect("gateway")
}

/// Build a command context against the mock server, storing the token in `dir`.
pub fn context_for(server: &MockServer, dir: &Path) -> Context {
    Context::new(config_for(server, dir), Diagnostics::default()).expect("context")
}

/// A successful `login` response for the given token and profile.
pub fn login_response(token: &str, profile_id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": {
            "login": {
                "token": token,
                "email": "reader@example.com",
                "languages": ["en"],
                "profile": {"id": profile_id, "handle": "reader"}
            }
        }
    }))
}

/// A credential as stored after a successful login.
pub fn credential() -> Credential {
    Credential {
        token: "stored-token".to_string(),
        profile_id: "profile-1".to_string(),
    }
}

/// A complete book draft without a cover.
pub fn draft() -> BookDraft {
    BookDraft {
        title: "The Dispossessed".to_string(),
        subtitle: Some("An Ambiguous Utopia".to_string()),
        description: None,
        authors: vec!["Ursula K. Le Guin".to_string()],
        language: "en".to_string(),
        published_date: Some("1974-05-01".to_string()),
        isbn10: None,
        isbn13: Some("9780061054884".to_string()),
        page_count: Some(387),
        publisher: Some("Harper & Row".to_string()),
        mature: false,
        physical_format: PhysicalFormat::Paperback,
        cover_path: None,
    }
}

#[cfg(test)]
mod tests {
    use super::ScriptedPrompter;
    use crate::{error::Error, prompt::Prompter};

    #[test]
    fn scripted_prompter_counts_and_drains() {
        let mut prompter = ScriptedPrompter::new().with_login("a@b.c", "pw");
        let first = prompter.request_credentials().expect("login");
        assert_eq!(first.email, "a@b.c");

        let second = prompter.request_credentials().expect_err("drained");
        assert!(matches!(second, Error::PromptCanceled));
        assert_eq!(prompter.credential_requests(), 2);
    }
}
