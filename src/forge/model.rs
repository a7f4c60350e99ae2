//! forge::model
//!
//! Provider-agnostic view of one repository remote.
//!
//! Every value here is built once by a normalizer and never mutated
//! afterwards. Collections are owned by value; nothing is shared between
//! pull requests, issues or successive aggregations.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Provider timestamp, keeping the offset the provider reported.
pub type Timestamp = DateTime<FixedOffset>;

/// Forge-side state of one remote at the time of the aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgeState {
    /// The remote URL exactly as it was passed in
    pub forge_remote: String,
    /// Open pull/merge requests, oldest first
    pub pull_requests: Vec<PullRequest>,
    /// Open issues, oldest first
    pub issues: Vec<Issue>,
}

impl ForgeState {
    /// Look up a pull request by number.
    pub fn pull_request(&self, number: u64) -> Option<&PullRequest> {
        self.pull_requests.iter().find(|pr| pr.number == number)
    }

    /// Look up an issue by number.
    pub fn issue(&self, number: u64) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.number == number)
    }
}

/// An open pull request (GitHub) or merge request (GitLab).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    /// Fetchable ref for the request's tip, `pull/<number>/head`
    pub remote_ref: String,
    pub author: String,
    pub created_at: Timestamp,
    pub body_text: String,
    pub comments: Vec<Comment>,
    pub assignees: Vec<String>,
    pub labels: Vec<Label>,
    pub commits: Vec<Commit>,
}

/// An open issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub created_at: Timestamp,
    pub body_text: String,
    pub comments: Vec<Comment>,
    pub assignees: Vec<String>,
    pub labels: Vec<Label>,
}

/// A label attached to a pull request or issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Opaque provider color (`#d9534f`, `d9534f`, ...)
    pub color: String,
}

/// A commit belonging to a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub hash: String,
    pub message: String,
    /// Parent hashes; empty when the provider schema does not expose them
    pub parents: Vec<String>,
    pub author_date: Timestamp,
    pub author_name: String,
    pub author_email: String,
    pub commit_date: Timestamp,
}

/// A discussion comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author: String,
    pub body: String,
    pub created_at: Timestamp,
}

/// Build the fetchable ref name for a pull request number.
pub fn remote_ref(number: u64) -> String {
    format!("pull/{}/head", number)
}

/// Sort by number ascending and drop repeated numbers, keeping the first.
///
/// Returns how many duplicates were dropped.
pub(crate) fn order_oldest_first<T>(items: &mut Vec<T>, number: impl Fn(&T) -> u64) -> usize {
    let before = items.len();
    items.sort_by_key(|item| number(item));
    items.dedup_by_key(|item| number(item));
    before - items.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn pr(number: u64, title: &str) -> PullRequest {
        PullRequest {
            number,
            title: title.to_string(),
            remote_ref: remote_ref(number),
            author: "alice".to_string(),
            created_at: ts("2024-03-01T10:00:00+01:00"),
            body_text: String::new(),
            comments: vec![],
            assignees: vec![],
            labels: vec![],
            commits: vec![],
        }
    }

    #[test]
    fn remote_ref_format() {
        assert_eq!(remote_ref(5), "pull/5/head");
        assert_eq!(remote_ref(1234), "pull/1234/head");
    }

    #[test]
    fn ordering_sorts_ascending_and_dedups() {
        let mut prs = vec![pr(7, "seven"), pr(5, "five"), pr(7, "seven again")];
        let dropped = order_oldest_first(&mut prs, |p| p.number);

        assert_eq!(dropped, 1);
        let numbers: Vec<u64> = prs.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![5, 7]);
    }

    #[test]
    fn ordering_is_stable_for_duplicates() {
        let mut prs = vec![pr(3, "first"), pr(3, "second")];
        order_oldest_first(&mut prs, |p| p.number);
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].title, "first");
    }

    #[test]
    fn forge_state_serializes_camel_case() {
        let state = ForgeState {
            forge_remote: "git@gitlab.com:acme/widget.git".to_string(),
            pull_requests: vec![pr(5, "five")],
            issues: vec![],
        };
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["forgeRemote"], "git@gitlab.com:acme/widget.git");
        assert_eq!(json["pullRequests"][0]["remoteRef"], "pull/5/head");
        assert_eq!(json["pullRequests"][0]["bodyText"], "");
        assert_eq!(json["pullRequests"][0]["createdAt"], "2024-03-01T10:00:00+01:00");
        assert!(json["issues"].as_array().unwrap().is_empty());
    }

    #[test]
    fn lookup_by_number() {
        let state = ForgeState {
            forge_remote: String::new(),
            pull_requests: vec![pr(5, "five"), pr(7, "seven")],
            issues: vec![],
        };
        assert_eq!(state.pull_request(7).map(|p| p.title.as_str()), Some("seven"));
        assert!(state.pull_request(6).is_none());
        assert!(state.issue(5).is_none());
    }
}
