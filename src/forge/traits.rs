//! forge::traits
//!
//! Error taxonomy and the transport seam shared by every forge adapter.
//!
//! # Design
//!
//! The `Transport` trait is async because it is the only stage of an
//! aggregation that performs network I/O. Everything before it (remote
//! resolution, query building) and after it (normalization) is a pure
//! function of its inputs.
//!
//! # Example
//!
//! ```ignore
//! use forgestate::forge::{QueryDocument, Transport, ForgeError};
//!
//! async fn ping(transport: &dyn Transport, token: &str) -> Result<(), ForgeError> {
//!     let doc = QueryDocument::new("query { currentUser { username } }", serde_json::json!({}));
//!     let raw = transport.query("https://gitlab.com/api/graphql", token, &doc).await?;
//!     println!("{}", raw);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors from forge aggregation.
///
/// Every variant propagates to the caller of `aggregate`; none are
/// swallowed or converted into empty results.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// The remote URL does not belong to any supported forge.
    ///
    /// Callers should treat this as "no forge integration available" rather
    /// than as a failure to report.
    #[error("unsupported remote: {0}")]
    UnsupportedRemote(String),

    /// No access token is configured for the resolved forge.
    #[error("authentication required: no token configured for {0}")]
    AuthRequired(String),

    /// The configured token cannot be sent as a bearer credential.
    #[error("invalid access token: {0}")]
    InvalidToken(String),

    /// The configuration handed to the aggregator failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Network or connection error reaching the provider.
    #[error("network error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status and no GraphQL errors.
    #[error("HTTP error: {status} - {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body (or reason phrase when the body is empty)
        message: String,
    },

    /// The provider returned a structured `errors` list.
    ///
    /// The payload is kept verbatim so it can be shown to the user as-is
    /// (expired token, missing scope, ...).
    #[error("provider API error: {0}")]
    ProviderApi(serde_json::Value),

    /// The provider does not know the repository or the token cannot see it.
    #[error("repository not found: {0}")]
    RepositoryNotFound(String),

    /// The response lacks fields the normalizer requires.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ForgeError {
    /// Whether this error only means "this remote has no forge support".
    pub fn is_unsupported_remote(&self) -> bool {
        matches!(self, ForgeError::UnsupportedRemote(_))
    }
}

/// A GraphQL request body: `{ "query": ..., "variables": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDocument {
    /// GraphQL query text
    pub query: String,
    /// Variables referenced by the query
    pub variables: serde_json::Value,
}

impl QueryDocument {
    /// Create a new query document.
    pub fn new(query: impl Into<String>, variables: serde_json::Value) -> Self {
        Self {
            query: query.into(),
            variables,
        }
    }
}

/// The network seam of an aggregation.
///
/// Implementations perform exactly one authenticated round trip per call and
/// return the parsed JSON body. A body carrying a non-empty top-level
/// `errors` array must be reported as [`ForgeError::ProviderApi`], even when
/// the HTTP status was 200.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one transport can serve
/// concurrent aggregations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `document` to `endpoint` using `token` as bearer credential.
    ///
    /// # Errors
    ///
    /// - `Transport` if the provider cannot be reached
    /// - `Http` for non-success responses without GraphQL errors
    /// - `ProviderApi` if the body carries an `errors` list
    /// - `MalformedResponse` if the body is not JSON
    async fn query(
        &self,
        endpoint: &str,
        token: &str,
        document: &QueryDocument,
    ) -> Result<serde_json::Value, ForgeError>;
}

/// Extract a non-empty top-level `errors` array from a GraphQL body.
pub(crate) fn graphql_errors(body: &serde_json::Value) -> Option<&serde_json::Value> {
    body.get("errors")
        .filter(|errors| errors.as_array().is_some_and(|list| !list.is_empty()))
}
