//! Authenticated request gateway.
//!
//! Every remote call goes through [`Gateway::send`], which shapes the request
//! envelope, attaches the bearer token and classifies the response into an
//! [`Outcome`]. Cover uploads to pre-signed URLs use [`Gateway::upload`].

use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use crate::{
    config::Config,
    diagnostics::Diagnostics,
    error::{Error, Result},
    operations::Operation,
};

/// An application-level error reported inside a 200 response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteError {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Response path the error applies to.
    #[serde(default)]
    pub path: Option<Vec<Value>>,
    /// Service-specific details.
    #[serde(default)]
    pub extensions: Option<Value>,
}

/// Classified result of a remote operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Status 200 without errors; carries `data[<operation name>]`.
    Success(Value),
    /// Any non-200 status.
    TransportFailure {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// Status 200 with an `errors` list.
    ApplicationFailure(Vec<RemoteError>),
}

/// Result of a binary upload to a pre-signed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The storage service accepted the bytes.
    Stored,
    /// The storage service answered with anything but 200.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

/// Raw response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    /// Payload keyed by operation name.
    data: Option<Value>,
    /// Application-level errors.
    errors: Option<Vec<RemoteError>>,
}

/// Client for the single GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct Gateway {
    /// Underlying HTTP client.
    client: Client,
    /// Endpoint every operation is posted to.
    endpoint: Url,
    /// Debug trace sink.
    diagnostics: Diagnostics,
}

impl Gateway {
    /// Build a gateway for the configured endpoint.
    pub fn new(config: &Config, diagnostics: Diagnostics) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| Error::ClientBuild { source })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            diagnostics,
        })
    }

    /// Send an operation and classify the response.
    pub async fn send(
        &self,
        operation: &Operation,
        variables: Value,
        token: Option<&str>,
    ) -> Result<Outcome> {
        let headers = build_headers(token)?;
        let body = json!({
            "query": operation.document,
            "variables": variables,
        });

        self.diagnostics.debug(format!(
            "POST {} operation={} authenticated={}",
            self.endpoint,
            operation.name,
            token.is_some()
        ));

        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(headers)
            .body(body.to_string())
            .send()
            .await
            .map_err(|source| Error::Http {
                operation: operation.name.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| Error::Http {
            operation: operation.name.to_string(),
            source,
        })?;

        self.diagnostics
            .debug(response_trace(operation, status, &text));

        classify(operation, status, &text)
    }

    /// Upload raw bytes to a pre-signed URL.
    pub async fn upload(
        &self,
        url: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadOutcome> {
        self.diagnostics
            .debug(format!("PUT {url} ({} bytes, {content_type})", bytes.len()));

        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|source| Error::Http {
                operation: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::OK {
            self.diagnostics.debug(format!("upload -> {}", status.as_u16()));
            return Ok(UploadOutcome::Stored);
        }

        let body = response.text().await.unwrap_or_default();
        self.diagnostics
            .debug(format!("upload -> {}: {body}", status.as_u16()));
        Ok(UploadOutcome::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Build request headers, attaching a bearer token when one is supplied.
pub fn build_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(token) = token {
        let value =
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| Error::InvalidToken)?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Field names whose values never appear in debug output.
const SECRET_FIELDS: &[&str] = &["token", "password"];

/// Describe a response for debug output with secret fields masked.
fn response_trace(operation: &Operation, status: StatusCode, body: &str) -> String {
    let shown = match serde_json::from_str::<Value>(body) {
        Ok(mut value) => {
            redact_secrets(&mut value);
            value.to_string()
        }
        Err(_) => body.to_string(),
    };
    format!("{} -> {}: {shown}", operation.name, status.as_u16())
}

/// Replace the values of secret fields anywhere in a JSON document.
fn redact_secrets(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if SECRET_FIELDS.contains(&key.as_str()) {
                    *field = Value::String("<redacted>".to_string());
                } else {
                    redact_secrets(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_secrets),
        _ => {}
    }
}

/// Classify a response by status and envelope contents.
fn classify(operation: &Operation, status: StatusCode, body: &str) -> Result<Outcome> {
    if status != StatusCode::OK {
        return Ok(Outcome::TransportFailure {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let envelope: Envelope =
        serde_json::from_str(body).map_err(|error| Error::ResponseDecode {
            operation: operation.name.to_string(),
            message: error.to_string(),
        })?;

    if let Some(errors) = envelope.errors {
        return Ok(Outcome::ApplicationFailure(errors));
    }

    envelope
        .data
        .and_then(|mut data| data.get_mut(operation.name).map(Value::take))
        .map(Outcome::Success)
        .ok_or_else(|| Error::MissingField {
            operation: operation.name.to_string(),
            field: format!("data.{}", operation.name),
        })
}

/// Collect the messages of application-level errors.
pub fn error_messages(errors: &[RemoteError]) -> Vec<String> {
    errors.iter().map(|error| error.message.clone()).collect()
}
