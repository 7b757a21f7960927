//! Repository context attached to chat turns and tool executions.

use serde::{Deserialize, Serialize};

/// Identifies the target of every file operation.
///
/// Supplied by the client on every request and immutable for the duration of
/// a single tool call. The named branch is a precondition; branch creation is
/// the provisioner's exclusive responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoContext {
    /// Full repository name, e.g. `acme/site`.
    pub repository: String,
    /// Branch every mutation targets.
    pub branch: String,
}

impl RepoContext {
    #[must_use]
    pub fn new(repository: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            branch: branch.into(),
        }
    }
}
