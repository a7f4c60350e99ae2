//! forge::gitlab
//!
//! GitLab adapter: query building and response normalization.
//!
//! # Design
//!
//! One GraphQL query fetches the most recent open merge requests and open
//! issues of a project. The response is decoded once into the private
//! schema types below, which mirror exactly the fields the query selects,
//! and then mapped into the unified model by pure functions.
//!
//! # Field coverage
//!
//! - merge requests: author, description, labels, assignees, commits
//! - commits: no parent hashes (the GitLab commit type does not expose them)
//! - comments: not queried, always empty
//!
//! Merge requests and issues come back oldest first, ascending by `iid`.

use log::{debug, warn};
use serde::Deserialize;
use serde_json::json;

use super::graphql::{decode, nullable, Connection, GHOST_AUTHOR};
use super::model::{self, Commit, Issue, Label, PullRequest, Timestamp};
use super::traits::{ForgeError, QueryDocument};
use crate::config::QueryLimits;

/// GraphQL endpoint of gitlab.com.
pub const GRAPHQL_ENDPOINT: &str = "https://gitlab.com/api/graphql";

const OPEN_MERGE_REQUESTS_AND_ISSUES: &str = r#"query GetOpenMergeRequestsAndIssues(
  $fullPath: ID!,
  $pullRequests: Int!,
  $issues: Int!,
  $labels: Int!,
  $commits: Int!,
  $assignees: Int!
) {
  project(fullPath: $fullPath) {
    mergeRequests(state: opened, sort: CREATED_DESC, first: $pullRequests) {
      edges {
        node {
          iid
          title
          author { username }
          createdAt
          description
          assignees(first: $assignees) { edges { node { username } } }
          labels(first: $labels) { edges { node { title color } } }
          commits(last: $commits) {
            edges {
              node {
                sha
                message
                authorName
                authorEmail
                authoredDate
                committedDate
              }
            }
          }
        }
      }
    }
    issues(state: opened, sort: CREATED_DESC, first: $issues) {
      edges {
        node {
          iid
          title
          author { username }
          createdAt
          description
          assignees(first: $assignees) { edges { node { username } } }
          labels(first: $labels) { edges { node { title color } } }
        }
      }
    }
  }
}"#;

/// Build the open merge requests and issues query for a project path.
///
/// # Example
///
/// ```
/// use forgestate::config::QueryLimits;
/// use forgestate::forge::gitlab;
///
/// let doc = gitlab::build_query("acme/widget", &QueryLimits::default());
/// assert_eq!(doc.variables["fullPath"], "acme/widget");
/// assert_eq!(doc.variables["pullRequests"], 20);
/// ```
pub fn build_query(full_path: &str, limits: &QueryLimits) -> QueryDocument {
    QueryDocument::new(
        OPEN_MERGE_REQUESTS_AND_ISSUES,
        json!({
            "fullPath": full_path,
            "pullRequests": limits.pull_requests,
            "issues": limits.issues,
            "labels": limits.labels,
            "commits": limits.commits,
            "assignees": limits.assignees,
        }),
    )
}

/// Map a GitLab response into pull requests and issues.
///
/// Pure: the same `raw` value always yields the same result.
///
/// # Errors
///
/// - `RepositoryNotFound` if `data.project` is `null`
/// - `MalformedResponse` if a selected field is missing or has the wrong type
pub fn normalize(
    full_path: &str,
    raw: &serde_json::Value,
) -> Result<(Vec<PullRequest>, Vec<Issue>), ForgeError> {
    let response: GitLabResponse = decode(raw)?;
    let data = response
        .data
        .ok_or_else(|| ForgeError::MalformedResponse("response has no data".to_string()))?;
    let project = data
        .project
        .ok_or_else(|| ForgeError::RepositoryNotFound(full_path.to_string()))?;

    let mut pull_requests = project
        .merge_requests
        .into_nodes()
        .map(PullRequest::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let mut issues = project
        .issues
        .into_nodes()
        .map(Issue::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let dropped = model::order_oldest_first(&mut pull_requests, |pr| pr.number);
    if dropped > 0 {
        warn!("{}: dropped {} duplicate merge requests", full_path, dropped);
    }
    let dropped = model::order_oldest_first(&mut issues, |issue| issue.number);
    if dropped > 0 {
        warn!("{}: dropped {} duplicate issues", full_path, dropped);
    }

    debug!(
        "{}: normalized {} merge requests, {} issues",
        full_path,
        pull_requests.len(),
        issues.len()
    );
    Ok((pull_requests, issues))
}

// --------------------------------------------------------------------------
// Response schema
// --------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GitLabResponse {
    #[serde(deserialize_with = "nullable")]
    data: Option<GitLabData>,
}

#[derive(Debug, Deserialize)]
struct GitLabData {
    #[serde(deserialize_with = "nullable")]
    project: Option<GitLabProject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitLabProject {
    merge_requests: Connection<GitLabMergeRequest>,
    issues: Connection<GitLabIssue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitLabMergeRequest {
    iid: String,
    title: String,
    #[serde(deserialize_with = "nullable")]
    author: Option<GitLabUser>,
    created_at: Timestamp,
    #[serde(deserialize_with = "nullable")]
    description: Option<String>,
    assignees: Connection<GitLabUser>,
    labels: Connection<GitLabLabel>,
    commits: Connection<GitLabCommit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitLabIssue {
    iid: String,
    title: String,
    #[serde(deserialize_with = "nullable")]
    author: Option<GitLabUser>,
    created_at: Timestamp,
    #[serde(deserialize_with = "nullable")]
    description: Option<String>,
    assignees: Connection<GitLabUser>,
    labels: Connection<GitLabLabel>,
}

#[derive(Debug, Deserialize)]
struct GitLabUser {
    username: String,
}

#[derive(Debug, Deserialize)]
struct GitLabLabel {
    title: String,
    color: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitLabCommit {
    sha: String,
    message: String,
    #[serde(deserialize_with = "nullable")]
    author_name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    author_email: Option<String>,
    authored_date: Timestamp,
    committed_date: Timestamp,
}

fn parse_iid(iid: &str) -> Result<u64, ForgeError> {
    iid.parse()
        .map_err(|_| ForgeError::MalformedResponse(format!("iid '{}' is not a number", iid)))
}

fn author_name(author: Option<GitLabUser>) -> String {
    author.map_or_else(|| GHOST_AUTHOR.to_string(), |user| user.username)
}

fn usernames(assignees: Connection<GitLabUser>) -> Vec<String> {
    assignees.into_nodes().map(|user| user.username).collect()
}

fn labels(labels: Connection<GitLabLabel>) -> Vec<Label> {
    labels.into_nodes().map(Label::from).collect()
}

impl From<GitLabLabel> for Label {
    fn from(label: GitLabLabel) -> Self {
        Label {
            name: label.title,
            color: label.color,
        }
    }
}

impl From<GitLabCommit> for Commit {
    fn from(commit: GitLabCommit) -> Self {
        Commit {
            hash: commit.sha,
            message: commit.message,
            parents: Vec::new(),
            author_date: commit.authored_date,
            author_name: commit.author_name.unwrap_or_default(),
            author_email: commit.author_email.unwrap_or_default(),
            commit_date: commit.committed_date,
        }
    }
}

impl TryFrom<GitLabMergeRequest> for PullRequest {
    type Error = ForgeError;

    fn try_from(mr: GitLabMergeRequest) -> Result<Self, Self::Error> {
        let number = parse_iid(&mr.iid)?;
        Ok(PullRequest {
            number,
            title: mr.title,
            remote_ref: model::remote_ref(number),
            author: author_name(mr.author),
            created_at: mr.created_at,
            body_text: mr.description.unwrap_or_default(),
            comments: Vec::new(),
            assignees: usernames(mr.assignees),
            labels: labels(mr.labels),
            commits: mr.commits.into_nodes().map(Commit::from).collect(),
        })
    }
}

impl TryFrom<GitLabIssue> for Issue {
    type Error = ForgeError;

    fn try_from(issue: GitLabIssue) -> Result<Self, Self::Error> {
        Ok(Issue {
            number: parse_iid(&issue.iid)?,
            title: issue.title,
            author: author_name(issue.author),
            created_at: issue.created_at,
            body_text: issue.description.unwrap_or_default(),
            comments: Vec::new(),
            assignees: usernames(issue.assignees),
            labels: labels(issue.labels),
        })
    }
}
