//! forge::aggregator
//!
//! The single entry point: remote URL in, [`ForgeState`] out.
//!
//! # Design
//!
//! An aggregation is a straight pipeline:
//!
//! 1. resolve the remote URL to a provider and repository path
//! 2. look up the provider's token
//! 3. build the provider query
//! 4. one transport call
//! 5. normalize the response
//!
//! Invalid configuration and steps 1 and 2 fail before any network traffic.
//! A response carrying GraphQL `errors` is rejected before normalization,
//! whichever transport produced it. Errors from every step propagate
//! unchanged. The aggregator keeps no state between calls, so
//! concurrent aggregations on one instance are independent.
//!
//! # Example
//!
//! ```
//! use forgestate::config::ForgeConfig;
//! use forgestate::forge::mock::MockTransport;
//! use forgestate::forge::{ForgeProvider, ForgeStateAggregator};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let transport = MockTransport::responding(json!({
//!     "data": { "project": {
//!         "mergeRequests": { "edges": [] },
//!         "issues": { "edges": [] }
//!     } }
//! }));
//! let config = ForgeConfig::default().with_token(ForgeProvider::GitLab, "T");
//! let aggregator = ForgeStateAggregator::new(config, transport);
//!
//! let state = aggregator.aggregate("git@gitlab.com:acme/widget.git").await.unwrap();
//! assert_eq!(state.forge_remote, "git@gitlab.com:acme/widget.git");
//! assert!(state.pull_requests.is_empty());
//! # });
//! ```

use log::{debug, info};

use super::model::ForgeState;
use super::remote::resolve_remote;
use super::traits::{graphql_errors, ForgeError, Transport};
use super::transport::{HttpTransport, RetryOnce};
use crate::config::ForgeConfig;

/// Aggregates forge state over a given transport.
#[derive(Debug)]
pub struct ForgeStateAggregator<T> {
    config: ForgeConfig,
    transport: T,
}

impl<T: Transport> ForgeStateAggregator<T> {
    /// Create an aggregator from configuration and a transport.
    pub fn new(config: ForgeConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// The transport in use.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch and normalize the open pull requests and issues of `remote_url`.
    ///
    /// `remote_url` is whatever git reports for a remote: a scheme URL or
    /// an SCP-style `user@host:path`.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the configuration fails validation
    /// - `UnsupportedRemote` if no known forge serves the remote
    /// - `AuthRequired` if no token is configured for that forge
    /// - `ProviderApi` if the response carries an `errors` list
    /// - any transport or normalization error, unchanged
    pub async fn aggregate(&self, remote_url: &str) -> Result<ForgeState, ForgeError> {
        self.config
            .validate()
            .map_err(|e| ForgeError::InvalidConfig(e.to_string()))?;

        let identity = resolve_remote(remote_url, &self.config)
            .ok_or_else(|| ForgeError::UnsupportedRemote(remote_url.to_string()))?;
        let provider = identity.provider;
        debug!(
            "{} resolved to {} project {}",
            remote_url, provider, identity.path
        );

        let token = self
            .config
            .token(provider)
            .ok_or_else(|| ForgeError::AuthRequired(provider.to_string()))?;

        let document = provider.build_query(&identity.path, &self.config.query);
        let endpoint = provider.endpoint(self.config.settings(provider));

        let raw = self.transport.query(endpoint, token, &document).await?;
        if let Some(errors) = graphql_errors(&raw) {
            return Err(ForgeError::ProviderApi(errors.clone()));
        }
        let (pull_requests, issues) = provider.normalize(&identity.path, &raw)?;

        info!(
            "{}: {} open pull requests, {} open issues",
            identity.path,
            pull_requests.len(),
            issues.len()
        );

        Ok(ForgeState {
            forge_remote: remote_url.to_string(),
            pull_requests,
            issues,
        })
    }
}

/// Aggregate `remote_url` over HTTP using `config`.
///
/// Builds an [`HttpTransport`] from `config.transport`, wrapped in
/// [`RetryOnce`] when `retry_once` is set.
///
/// # Errors
///
/// Same as [`ForgeStateAggregator::aggregate`], plus `Transport` if the
/// HTTP client cannot be created.
pub async fn aggregate(remote_url: &str, config: &ForgeConfig) -> Result<ForgeState, ForgeError> {
    config
        .validate()
        .map_err(|e| ForgeError::InvalidConfig(e.to_string()))?;
    let http = HttpTransport::from_settings(&config.transport)?;
    if config.transport.retry_once {
        ForgeStateAggregator::new(config.clone(), RetryOnce::new(http))
            .aggregate(remote_url)
            .await
    } else {
        ForgeStateAggregator::new(config.clone(), http)
            .aggregate(remote_url)
            .await
    }
}
