//! forge::factory
//!
//! Forge selection.
//!
//! # Design
//!
//! Each supported forge is one variant of [`ForgeProvider`]. The variant is
//! chosen by the host of the remote URL and then dispatches to the provider
//! module for the three provider-specific capabilities:
//!
//! - which repository paths it accepts
//! - how the "open requests and issues" query is built
//! - how the provider response is normalized
//!
//! Adding a forge means adding a variant and a module; the aggregator does
//! not change.
//!
//! # Provider Detection
//!
//! - `gitlab.com` and configured GitLab hosts → [`ForgeProvider::GitLab`]
//! - `github.com` and configured GitHub hosts → [`ForgeProvider::GitHub`]

use super::model::{Issue, PullRequest};
use super::traits::{ForgeError, QueryDocument};
use super::{github, gitlab};
use crate::config::{ForgeConfig, ProviderSettings, QueryLimits};

/// Supported forge providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForgeProvider {
    /// GitLab (gitlab.com or self-hosted)
    GitLab,
    /// GitHub (github.com or Enterprise)
    GitHub,
}

impl ForgeProvider {
    /// All providers, in detection order.
    pub fn all() -> &'static [ForgeProvider] {
        &[ForgeProvider::GitLab, ForgeProvider::GitHub]
    }

    /// Provider name as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            ForgeProvider::GitLab => "gitlab",
            ForgeProvider::GitHub => "github",
        }
    }

    /// Public host served by this provider.
    pub fn default_host(&self) -> &'static str {
        match self {
            ForgeProvider::GitLab => "gitlab.com",
            ForgeProvider::GitHub => "github.com",
        }
    }

    /// GraphQL endpoint of the public instance.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ForgeProvider::GitLab => gitlab::GRAPHQL_ENDPOINT,
            ForgeProvider::GitHub => github::GRAPHQL_ENDPOINT,
        }
    }

    /// Find the provider serving `host`.
    ///
    /// Public hosts always match; configured hosts match the provider whose
    /// settings list them. Comparison ignores ASCII case.
    pub fn for_host(host: &str, config: &ForgeConfig) -> Option<Self> {
        Self::all().iter().copied().find(|provider| {
            host.eq_ignore_ascii_case(provider.default_host())
                || config.settings(*provider).is_some_and(|settings| {
                    settings
                        .hosts
                        .iter()
                        .any(|configured| configured.eq_ignore_ascii_case(host))
                })
        })
    }

    /// Whether a repository path has the shape this provider uses.
    pub fn accepts_path(&self, path: &str) -> bool {
        let segments = path.split('/').count();
        match self {
            // Projects may live in nested subgroups.
            ForgeProvider::GitLab => segments >= 2,
            ForgeProvider::GitHub => segments == 2,
        }
    }

    /// Endpoint to query, honoring a configured override.
    pub fn endpoint<'a>(&self, settings: Option<&'a ProviderSettings>) -> &'a str {
        settings
            .and_then(|s| s.endpoint.as_deref())
            .unwrap_or(self.default_endpoint())
    }

    /// Build the "open requests and issues" query for `path`.
    pub fn build_query(&self, path: &str, limits: &QueryLimits) -> QueryDocument {
        match self {
            ForgeProvider::GitLab => gitlab::build_query(path, limits),
            ForgeProvider::GitHub => github::build_query(path, limits),
        }
    }

    /// Normalize a raw provider response into the unified model.
    pub fn normalize(
        &self,
        path: &str,
        raw: &serde_json::Value,
    ) -> Result<(Vec<PullRequest>, Vec<Issue>), ForgeError> {
        match self {
            ForgeProvider::GitLab => gitlab::normalize(path, raw),
            ForgeProvider::GitHub => github::normalize(path, raw),
        }
    }
}

impl std::fmt::Display for ForgeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
