//! forgestate - open pull requests and issues of a git remote, normalized
//!
//! Given the URL of a git remote, `forgestate` works out which forge serves
//! it, sends one bounded GraphQL query and maps the answer into a
//! provider-independent [`forge::ForgeState`].
//!
//! # Architecture
//!
//! - [`forge`] - Remote resolution, provider queries, transport, normalization
//! - [`config`] - Provider tokens, endpoints, hosts and query limits
//! - [`git`] - Remote lookup in a local repository (used by the binary)
//! - [`cli`] - The `forge-state` binary
//!
//! # Invariants
//!
//! 1. An unsupported remote or missing token never reaches the network
//! 2. Every aggregation issues one provider query, repeated at most once by `RetryOnce`
//! 3. Missing response fields are errors, never empty collections
//! 4. Pull requests and issues are ordered oldest first by number

pub mod cli;
pub mod config;
pub mod forge;
pub mod git;
