//! forge::transport
//!
//! HTTP implementation of the [`Transport`] seam.
//!
//! # Design
//!
//! One POST of the GraphQL document per call, authenticated with
//! `Authorization: Bearer <token>`. Status and body are mapped onto
//! [`ForgeError`] in this order:
//!
//! 1. the request cannot be sent or the body cannot be read → `Transport`
//! 2. the body is not JSON → `MalformedResponse` (or `Http` for a
//!    non-success status)
//! 3. the body has a non-empty `errors` list → `ProviderApi`, whatever the
//!    status
//! 4. any other non-success status → `Http`
//!
//! [`RetryOnce`] wraps any transport and repeats a call once when it failed
//! with a `Transport` error. Nothing retries by default.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};

use super::traits::{graphql_errors, ForgeError, QueryDocument, Transport};
use crate::config::TransportSettings;

/// User agent sent with every request.
const USER_AGENT_VALUE: &str = "forgestate";

/// Transport over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the HTTP client cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, ForgeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForgeError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Create a transport from configured settings.
    pub fn from_settings(settings: &TransportSettings) -> Result<Self, ForgeError> {
        Self::new(Duration::from_secs(settings.timeout_secs))
    }

    fn headers(token: &str) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            ForgeError::InvalidToken("contains characters not allowed in a header".into())
        })?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }
}

/// Map a status and body onto the transport contract.
fn interpret(status: StatusCode, body: &str) -> Result<serde_json::Value, ForgeError> {
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(body);

    let value = match parsed {
        Ok(value) => value,
        Err(e) if status.is_success() => {
            return Err(ForgeError::MalformedResponse(format!(
                "response body is not JSON: {}",
                e
            )))
        }
        Err(_) => return Err(http_error(status, body)),
    };

    if let Some(errors) = graphql_errors(&value) {
        return Err(ForgeError::ProviderApi(errors.clone()));
    }

    if !status.is_success() {
        return Err(http_error(status, body));
    }

    Ok(value)
}

fn http_error(status: StatusCode, body: &str) -> ForgeError {
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("Unknown error").to_string()
    } else {
        body.trim().to_string()
    };
    ForgeError::Http {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn query(
        &self,
        endpoint: &str,
        token: &str,
        document: &QueryDocument,
    ) -> Result<serde_json::Value, ForgeError> {
        debug!("POST {}", endpoint);

        let response = self
            .client
            .post(endpoint)
            .headers(Self::headers(token)?)
            .json(document)
            .send()
            .await
            .map_err(|e| ForgeError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ForgeError::Transport(e.to_string()))?;

        debug!("{} answered {} ({} bytes)", endpoint, status.as_u16(), body.len());
        interpret(status, &body)
    }
}

/// Retry a call once when it fails with a network error.
///
/// Provider answers (`Http`, `ProviderApi`, ...) are returned as-is.
#[derive(Debug, Clone)]
pub struct RetryOnce<T> {
    inner: T,
}

impl<T: Transport> RetryOnce<T> {
    /// Wrap `inner`.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// The wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryOnce<T> {
    async fn query(
        &self,
        endpoint: &str,
        token: &str,
        document: &QueryDocument,
    ) -> Result<serde_json::Value, ForgeError> {
        match self.inner.query(endpoint, token, document).await {
            Err(ForgeError::Transport(message)) => {
                warn!("{}: {}; retrying once", endpoint, message);
                self.inner.query(endpoint, token, document).await
            }
            other => other,
        }
    }
}
