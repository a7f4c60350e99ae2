//! git::interface
//!
//! Read-only access to the remotes of a repository using git2.
//!
//! # Example
//!
//! ```no_run
//! use forgestate::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new(".")).unwrap();
//! if let Some(name) = git.default_remote().unwrap() {
//!     println!("{}: {:?}", name, git.remote_url(&name).unwrap());
//! }
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// The repository has no remote with this name.
    #[error("no remote named '{name}'")]
    RemoteNotFound { name: String },

    /// The repository has no remotes at all.
    #[error("repository has no remotes")]
    NoRemotes,

    /// Any other git2 failure.
    #[error("git error: {message}")]
    Internal { message: String },
}

impl From<git2::Error> for GitError {
    fn from(e: git2::Error) -> Self {
        GitError::Internal {
            message: e.message().to_string(),
        }
    }
}

/// A discovered repository.
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git").field("path", &self.repo.path()).finish()
    }
}

impl Git {
    /// Open the repository containing `path`, searching parent directories.
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        Ok(Self { repo })
    }

    /// URL of remote `name`, or `None` if it has none or the URL is not UTF-8.
    ///
    /// # Errors
    ///
    /// Returns `RemoteNotFound` if no such remote is configured.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e)
                if matches!(
                    e.code(),
                    git2::ErrorCode::NotFound | git2::ErrorCode::InvalidSpec
                ) =>
            {
                Err(GitError::RemoteNotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Name of the default remote: `origin` if present, else the first one.
    pub fn default_remote(&self) -> Result<Option<String>, GitError> {
        let remotes = self.repo.remotes()?;

        if remotes.iter().flatten().any(|name| name == "origin") {
            return Ok(Some("origin".to_string()));
        }

        Ok(remotes.iter().flatten().next().map(String::from))
    }

    /// URL of remote `name`, or of the default remote when `name` is `None`.
    ///
    /// # Errors
    ///
    /// - `NoRemotes` if `name` is `None` and nothing is configured
    /// - `RemoteNotFound` if the remote does not exist or has no URL
    pub fn resolve_remote_url(&self, name: Option<&str>) -> Result<String, GitError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.default_remote()?.ok_or(GitError::NoRemotes)?,
        };
        self.remote_url(&name)?
            .ok_or(GitError::RemoteNotFound { name })
    }
}
