//! forge::github
//!
//! GitHub adapter: query building and response normalization.
//!
//! # Design
//!
//! Mirrors the GitLab adapter: one GraphQL query for the most recent open
//! pull requests and issues, decoded once into private schema types and
//! mapped into the unified model.
//!
//! # Field coverage
//!
//! GitHub exposes more than GitLab through the same query, so this adapter
//! also fills in comments and commit parent hashes.
//!
//! Pull requests and issues come back oldest first, ascending by number,
//! matching the GitLab adapter.

use log::{debug, warn};
use serde::Deserialize;
use serde_json::json;

use super::graphql::{decode, nullable, Connection, Nodes, GHOST_AUTHOR};
use super::model::{self, Comment, Commit, Issue, Label, PullRequest, Timestamp};
use super::traits::{ForgeError, QueryDocument};
use crate::config::QueryLimits;

/// GraphQL endpoint of github.com.
pub const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

const OPEN_PULL_REQUESTS_AND_ISSUES: &str = r#"query GetOpenPullRequestsAndIssues(
  $owner: String!,
  $name: String!,
  $pullRequests: Int!,
  $issues: Int!,
  $labels: Int!,
  $commits: Int!,
  $comments: Int!,
  $assignees: Int!
) {
  repository(owner: $owner, name: $name) {
    pullRequests(states: OPEN, first: $pullRequests, orderBy: {field: CREATED_AT, direction: DESC}) {
      edges {
        node {
          number
          title
          author { login }
          createdAt
          body
          comments(last: $comments) { edges { node { author { login } body createdAt } } }
          assignees(first: $assignees) { edges { node { login } } }
          labels(first: $labels) { edges { node { name color } } }
          commits(last: $commits) {
            edges {
              node {
                commit {
                  oid
                  message
                  authoredDate
                  committedDate
                  author { name email }
                  parents(first: 8) { nodes { oid } }
                }
              }
            }
          }
        }
      }
    }
    issues(states: OPEN, first: $issues, orderBy: {field: CREATED_AT, direction: DESC}) {
      edges {
        node {
          number
          title
          author { login }
          createdAt
          body
          comments(last: $comments) { edges { node { author { login } body createdAt } } }
          assignees(first: $assignees) { edges { node { login } } }
          labels(first: $labels) { edges { node { name color } } }
        }
      }
    }
  }
}"#;

/// Build the open pull requests and issues query for `owner/repo`.
///
/// # Example
///
/// ```
/// use forgestate::config::QueryLimits;
/// use forgestate::forge::github;
///
/// let doc = github::build_query("octocat/hello-world", &QueryLimits::default());
/// assert_eq!(doc.variables["owner"], "octocat");
/// assert_eq!(doc.variables["name"], "hello-world");
/// ```
pub fn build_query(path: &str, limits: &QueryLimits) -> QueryDocument {
    let (owner, name) = path.split_once('/').unwrap_or((path, ""));
    QueryDocument::new(
        OPEN_PULL_REQUESTS_AND_ISSUES,
        json!({
            "owner": owner,
            "name": name,
            "pullRequests": limits.pull_requests,
            "issues": limits.issues,
            "labels": limits.labels,
            "commits": limits.commits,
            "comments": limits.comments,
            "assignees": limits.assignees,
        }),
    )
}

/// Map a GitHub response into pull requests and issues.
///
/// # Errors
///
/// - `RepositoryNotFound` if `data.repository` is `null`
/// - `MalformedResponse` if a selected field is missing or has the wrong type
pub fn normalize(
    path: &str,
    raw: &serde_json::Value,
) -> Result<(Vec<PullRequest>, Vec<Issue>), ForgeError> {
    let response: GitHubResponse = decode(raw)?;
    let data = response
        .data
        .ok_or_else(|| ForgeError::MalformedResponse("response has no data".to_string()))?;
    let repository = data
        .repository
        .ok_or_else(|| ForgeError::RepositoryNotFound(path.to_string()))?;

    let mut pull_requests: Vec<PullRequest> = repository
        .pull_requests
        .into_nodes()
        .map(PullRequest::from)
        .collect();
    let mut issues: Vec<Issue> = repository.issues.into_nodes().map(Issue::from).collect();

    let dropped = model::order_oldest_first(&mut pull_requests, |pr| pr.number);
    if dropped > 0 {
        warn!("{}: dropped {} duplicate pull requests", path, dropped);
    }
    let dropped = model::order_oldest_first(&mut issues, |issue| issue.number);
    if dropped > 0 {
        warn!("{}: dropped {} duplicate issues", path, dropped);
    }

    debug!(
        "{}: normalized {} pull requests, {} issues",
        path,
        pull_requests.len(),
        issues.len()
    );
    Ok((pull_requests, issues))
}

// --------------------------------------------------------------------------
// Response schema
// --------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GitHubResponse {
    #[serde(deserialize_with = "nullable")]
    data: Option<GitHubData>,
}

#[derive(Debug, Deserialize)]
struct GitHubData {
    #[serde(deserialize_with = "nullable")]
    repository: Option<GitHubRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubRepository {
    pull_requests: Connection<GitHubPullRequest>,
    issues: Connection<GitHubIssue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubPullRequest {
    number: u64,
    title: String,
    #[serde(deserialize_with = "nullable")]
    author: Option<GitHubActor>,
    created_at: Timestamp,
    #[serde(deserialize_with = "nullable")]
    body: Option<String>,
    comments: Connection<GitHubComment>,
    assignees: Connection<GitHubActor>,
    labels: Connection<GitHubLabel>,
    commits: Connection<GitHubPullRequestCommit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubIssue {
    number: u64,
    title: String,
    #[serde(deserialize_with = "nullable")]
    author: Option<GitHubActor>,
    created_at: Timestamp,
    #[serde(deserialize_with = "nullable")]
    body: Option<String>,
    comments: Connection<GitHubComment>,
    assignees: Connection<GitHubActor>,
    labels: Connection<GitHubLabel>,
}

#[derive(Debug, Deserialize)]
struct GitHubActor {
    login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubComment {
    #[serde(deserialize_with = "nullable")]
    author: Option<GitHubActor>,
    #[serde(deserialize_with = "nullable")]
    body: Option<String>,
    created_at: Timestamp,
}

#[derive(Debug, Deserialize)]
struct GitHubLabel {
    name: String,
    color: String,
}

/// Pull request commits wrap the git commit object.
#[derive(Debug, Deserialize)]
struct GitHubPullRequestCommit {
    commit: GitHubCommit,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubCommit {
    oid: String,
    message: String,
    authored_date: Timestamp,
    committed_date: Timestamp,
    #[serde(deserialize_with = "nullable")]
    author: Option<GitHubGitActor>,
    parents: Nodes<GitHubCommitRef>,
}

#[derive(Debug, Deserialize)]
struct GitHubGitActor {
    #[serde(deserialize_with = "nullable")]
    name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitRef {
    oid: String,
}

fn login(actor: Option<GitHubActor>) -> String {
    actor.map_or_else(|| GHOST_AUTHOR.to_string(), |a| a.login)
}

fn logins(actors: Connection<GitHubActor>) -> Vec<String> {
    actors.into_nodes().map(|a| a.login).collect()
}

fn comments(comments: Connection<GitHubComment>) -> Vec<Comment> {
    comments
        .into_nodes()
        .map(|c| Comment {
            author: login(c.author),
            body: c.body.unwrap_or_default(),
            created_at: c.created_at,
        })
        .collect()
}

fn labels(labels: Connection<GitHubLabel>) -> Vec<Label> {
    labels
        .into_nodes()
        .map(|l| Label {
            name: l.name,
            color: l.color,
        })
        .collect()
}

impl From<GitHubPullRequestCommit> for Commit {
    fn from(node: GitHubPullRequestCommit) -> Self {
        let commit = node.commit;
        let (author_name, author_email) = commit
            .author
            .map(|a| (a.name.unwrap_or_default(), a.email.unwrap_or_default()))
            .unwrap_or_default();

        Commit {
            hash: commit.oid,
            message: commit.message,
            parents: commit.parents.nodes.into_iter().map(|p| p.oid).collect(),
            author_date: commit.authored_date,
            author_name,
            author_email,
            commit_date: commit.committed_date,
        }
    }
}

impl From<GitHubPullRequest> for PullRequest {
    fn from(pr: GitHubPullRequest) -> Self {
        PullRequest {
            number: pr.number,
            title: pr.title,
            remote_ref: model::remote_ref(pr.number),
            author: login(pr.author),
            created_at: pr.created_at,
            body_text: pr.body.unwrap_or_default(),
            comments: comments(pr.comments),
            assignees: logins(pr.assignees),
            labels: labels(pr.labels),
            commits: pr.commits.into_nodes().map(Commit::from).collect(),
        }
    }
}

impl From<GitHubIssue> for Issue {
    fn from(issue: GitHubIssue) -> Self {
        Issue {
            number: issue.number,
            title: issue.title,
            author: login(issue.author),
            created_at: issue.created_at,
            body_text: issue.body.unwrap_or_default(),
            comments: comments(issue.comments),
            assignees: logins(issue.assignees),
            labels: labels(issue.labels),
        }
    }
}
