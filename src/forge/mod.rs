//! forge
//!
//! Aggregation of open pull requests and issues from remote forges
//! (GitLab, GitHub) into one normalized model.
//!
//! # Architecture
//!
//! [`ForgeStateAggregator`] is the entry point. Everything else is a
//! collaborator it drives in order:
//!
//! - `remote`: remote URL → provider and repository path
//! - `factory`: [`ForgeProvider`] dispatch to the provider modules
//! - [`gitlab`], [`github`]: query text and response normalization
//! - `transport`: the HTTP [`Transport`] and the [`RetryOnce`] wrapper
//! - [`mock`]: canned-response transport for deterministic testing
//! - `model`: the normalized [`ForgeState`]
//!
//! Only the transport performs I/O. Resolution, query building and
//! normalization are pure functions and are tested without a network.
//!
//! # Example
//!
//! ```no_run
//! use forgestate::config::ForgeConfig;
//! use forgestate::forge::{aggregate, ForgeProvider};
//!
//! # tokio_test::block_on(async {
//! let config = ForgeConfig::default().with_token(ForgeProvider::GitHub, "ghp_xxxx");
//!
//! match aggregate("git@github.com:octocat/hello-world.git", &config).await {
//!     Ok(state) => {
//!         for pr in &state.pull_requests {
//!             println!("#{} {} ({})", pr.number, pr.title, pr.remote_ref);
//!         }
//!     }
//!     Err(e) if e.is_unsupported_remote() => {}
//!     Err(e) => eprintln!("{}", e),
//! }
//! # });
//! ```

mod aggregator;
mod factory;
pub mod github;
pub mod gitlab;
mod graphql;
pub mod mock;
mod model;
mod remote;
mod traits;
mod transport;

pub use aggregator::{aggregate, ForgeStateAggregator};
pub use factory::ForgeProvider;
pub use model::{remote_ref, Comment, Commit, ForgeState, Issue, Label, PullRequest, Timestamp};
pub use remote::{parse_remote_url, resolve_remote, RemoteIdentity, RemoteUrl};
pub use traits::{ForgeError, QueryDocument, Transport};
pub use transport::{HttpTransport, RetryOnce};
