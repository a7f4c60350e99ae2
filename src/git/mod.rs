//! git
//!
//! Remote lookup in a local repository.
//!
//! This module is the only place that touches `git2`. The aggregation core
//! takes a remote URL string and never opens a repository itself.

mod interface;

pub use interface::{Git, GitError};
