//! config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! [gitlab]
//! token = "glpat-xxxx"
//! hosts = ["gitlab.example.com"]
//! endpoint = "https://gitlab.example.com/api/graphql"
//!
//! [github]
//! token = "ghp_xxxx"
//!
//! [query]
//! pull_requests = 20
//! commits = 100
//!
//! [transport]
//! timeout_secs = 30
//! retry_once = false
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing: limits must be within the page size
//! the forges accept, endpoints must be http(s) URLs.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::forge::ForgeProvider;

/// Largest page size GitLab and GitHub accept for a connection.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Everything an aggregation needs besides the remote URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ForgeConfig {
    /// GitLab settings
    pub gitlab: Option<ProviderSettings>,

    /// GitHub settings
    pub github: Option<ProviderSettings>,

    /// Bounds of the single query sent per aggregation
    pub query: QueryLimits,

    /// HTTP transport settings
    pub transport: TransportSettings,
}

impl ForgeConfig {
    /// Settings for one provider, if configured.
    pub fn settings(&self, provider: ForgeProvider) -> Option<&ProviderSettings> {
        match provider {
            ForgeProvider::GitLab => self.gitlab.as_ref(),
            ForgeProvider::GitHub => self.github.as_ref(),
        }
    }

    /// Access token for one provider. Empty tokens count as missing.
    pub fn token(&self, provider: ForgeProvider) -> Option<&str> {
        self.settings(provider)
            .and_then(|s| s.token.as_deref())
            .filter(|token| !token.is_empty())
    }

    /// Return a copy with `token` set for `provider`.
    pub fn with_token(mut self, provider: ForgeProvider, token: impl Into<String>) -> Self {
        let slot = match provider {
            ForgeProvider::GitLab => &mut self.gitlab,
            ForgeProvider::GitHub => &mut self.github,
        };
        slot.get_or_insert_with(ProviderSettings::default).token = Some(token.into());
        self
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for provider in ForgeProvider::all() {
            if let Some(settings) = self.settings(*provider) {
                settings.validate(*provider)?;
            }
        }
        self.query.validate()?;
        self.transport.validate()
    }
}

/// Per-provider settings.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSettings {
    /// Personal access token sent as bearer credential
    pub token: Option<String>,

    /// GraphQL endpoint override (self-hosted instances)
    pub endpoint: Option<String>,

    /// Extra hosts served by this provider
    pub hosts: Vec<String>,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("has_token", &self.token.is_some())
            .field("endpoint", &self.endpoint)
            .field("hosts", &self.hosts)
            .finish()
    }
}

impl ProviderSettings {
    fn validate(&self, provider: ForgeProvider) -> Result<(), ConfigError> {
        if let Some(endpoint) = &self.endpoint {
            if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "{}.endpoint must be an http(s) URL, got '{}'",
                    provider, endpoint
                )));
            }
        }

        if let Some(host) = self
            .hosts
            .iter()
            .find(|h| h.is_empty() || h.contains('/') || h.contains(':'))
        {
            return Err(ConfigError::InvalidValue(format!(
                "{}.hosts entries must be bare host names, got '{}'",
                provider, host
            )));
        }

        Ok(())
    }
}

/// Page sizes of the single bounded query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct QueryLimits {
    /// Most recent open pull/merge requests
    pub pull_requests: u32,
    /// Most recent open issues
    pub issues: u32,
    /// Labels per request or issue
    pub labels: u32,
    /// Commits per request
    pub commits: u32,
    /// Comments per request or issue (providers that expose them)
    pub comments: u32,
    /// Assignees per request or issue
    pub assignees: u32,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            pull_requests: 20,
            issues: 20,
            labels: 10,
            commits: 100,
            comments: 20,
            assignees: 10,
        }
    }
}

impl QueryLimits {
    fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("pull_requests", self.pull_requests),
            ("issues", self.issues),
            ("labels", self.labels),
            ("commits", self.commits),
            ("comments", self.comments),
            ("assignees", self.assignees),
        ];

        for (name, value) in limits {
            if value == 0 || value > MAX_PAGE_SIZE {
                return Err(ConfigError::InvalidValue(format!(
                    "query.{} must be between 1 and {}, got {}",
                    name, MAX_PAGE_SIZE, value
                )));
            }
        }

        Ok(())
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TransportSettings {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retry once on network failure (off unless asked for)
    pub retry_once: bool,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            retry_once: false,
        }
    }
}

impl TransportSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "transport.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ForgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.query.pull_requests, 20);
        assert_eq!(config.query.labels, 10);
        assert_eq!(config.query.commits, 100);
        assert_eq!(config.transport.timeout_secs, 30);
        assert!(!config.transport.retry_once);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [gitlab]
            token = "glpat-abc"
            hosts = ["gitlab.example.com"]
            endpoint = "https://gitlab.example.com/api/graphql"

            [github]
            token = "ghp_abc"

            [query]
            pull_requests = 50

            [transport]
            timeout_secs = 5
            retry_once = true
        "#;

        let config: ForgeConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.token(ForgeProvider::GitLab), Some("glpat-abc"));
        assert_eq!(config.token(ForgeProvider::GitHub), Some("ghp_abc"));
        assert_eq!(config.query.pull_requests, 50);
        assert_eq!(config.query.issues, 20);
        assert_eq!(config.transport.timeout_secs, 5);
        assert!(config.transport.retry_once);
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<ForgeConfig, _> = toml::from_str("[bitbucket]\ntoken = \"x\"\n");
        assert!(result.is_err());

        let result: Result<ForgeConfig, _> = toml::from_str("[gitlab]\ntokn = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let config = ForgeConfig::default().with_token(ForgeProvider::GitLab, "");
        assert_eq!(config.token(ForgeProvider::GitLab), None);
        assert_eq!(config.token(ForgeProvider::GitHub), None);
    }

    #[test]
    fn with_token_keeps_other_settings() {
        let config = ForgeConfig {
            gitlab: Some(ProviderSettings {
                hosts: vec!["git.example.com".into()],
                ..Default::default()
            }),
            ..Default::default()
        }
        .with_token(ForgeProvider::GitLab, "T");

        let settings = config.settings(ForgeProvider::GitLab).unwrap();
        assert_eq!(settings.token.as_deref(), Some("T"));
        assert_eq!(settings.hosts, vec!["git.example.com".to_string()]);
    }

    #[test]
    fn zero_limit_rejected() {
        let mut config = ForgeConfig::default();
        config.query.commits = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("query.commits"));
    }

    #[test]
    fn oversized_limit_rejected() {
        let mut config = ForgeConfig::default();
        config.query.pull_requests = MAX_PAGE_SIZE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn endpoint_must_be_http() {
        let config = ForgeConfig {
            gitlab: Some(ProviderSettings {
                endpoint: Some("gitlab.example.com/api/graphql".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gitlab.endpoint"));
    }

    #[test]
    fn hosts_must_be_bare() {
        let config = ForgeConfig {
            github: Some(ProviderSettings {
                hosts: vec!["https://ghe.example.com".into()],
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = ForgeConfig::default();
        config.transport.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_token() {
        let settings = ProviderSettings {
            token: Some("secret_token_abc123".into()),
            ..Default::default()
        };
        let debug_output = format!("{:?}", settings);
        assert!(!debug_output.contains("secret_token_abc123"));
        assert!(debug_output.contains("has_token"));
    }
}
