//! Branch provisioning.
//!
//! Repository selection isolates model-driven edits from the user's working
//! branch: every selection creates a fresh timestamp-named branch off the
//! base branch head and returns the branch's file tree so the client can
//! populate its view without a second round trip.

use chrono::Utc;

use crate::{GatewayError, GithubClient, TreeEntry};

/// Result of selecting a repository for a chat session.
#[derive(Debug, Clone)]
pub struct Provisioned {
    /// The freshly created working branch.
    pub branch: String,
    /// The branch it was forked from.
    pub base_branch: String,
    /// Full blob listing of the new branch.
    pub files: Vec<TreeEntry>,
}

/// Branch names are sortable to the second. Collisions are not checked:
/// two selections of the same repository within one second make the second
/// ref-creation call fail with [`GatewayError::BranchConflict`].
#[must_use]
pub fn chat_branch_name() -> String {
    format!("chat-{}", Utc::now().format("%Y%m%d-%H%M%S"))
}

/// Create an isolated working branch and list its contents.
///
/// Resolves `base_branch` to the repository default when omitted, copies the
/// base head pointer into a new `chat-{timestamp}` branch, and returns the
/// tree of the new branch.
pub async fn select_repository(
    client: &GithubClient,
    repository: &str,
    base_branch: Option<&str>,
) -> Result<Provisioned, GatewayError> {
    let base_branch = match base_branch {
        Some(branch) => branch.to_string(),
        None => client.default_branch(repository).await?,
    };

    let head = client.branch_head(repository, &base_branch).await?;
    let branch = chat_branch_name();
    client.create_branch(repository, &branch, &head).await?;
    tracing::info!(repository, %branch, %base_branch, "provisioned chat branch");

    let files = client.list_tree(repository, &branch).await?;
    Ok(Provisioned {
        branch,
        base_branch,
        files,
    })
}
