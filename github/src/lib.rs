//! Remote repository gateway.
//!
//! Thin adapter over the GitHub REST v3 API: read a blob, list a tree,
//! create a branch, write a blob with a commit. Every mutation targets a
//! single file and produces exactly one commit; there is no batching and no
//! caching of revision tokens across calls — callers re-fetch immediately
//! before editing, so concurrent external edits only fail on true races.

pub mod provision;

use std::sync::OnceLock;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub use provision::{Provisioned, select_repository};

/// Canonical GitHub REST API base URL.
pub const GITHUB_API_BASE_URL: &str = "https://api.github.com";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;
const PAGE_SIZE: usize = 100;

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build gateway HTTP client: {e}. Using defaults.");
                reqwest::Client::new()
            })
    })
}

/// Failures at the gateway boundary.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("file not found: {path}")]
    FileNotFound { path: String },
    #[error("write conflict on {path}: content changed since it was fetched")]
    WriteConflict { path: String },
    #[error("branch already exists: {branch}")]
    BranchConflict { branch: String },
    #[error("GitHub API error {status}: {body}")]
    Http { status: u16, body: String },
    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed file content for {path}: {message}")]
    Decode { path: String, message: String },
}

/// Commit author/committer identity recorded on every write.
#[derive(Debug, Clone)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

/// Repository metadata as listed for the client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    pub private: bool,
    pub default_branch: String,
}

/// One blob in a branch tree listing.
#[derive(Debug, Clone, Serialize)]
pub struct TreeEntry {
    pub path: String,
    pub sha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// A file fetched from the remote store.
///
/// `sha` is the revision token the remote requires back, unchanged, when the
/// file is updated; a stale token makes the update fail with a conflict.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub path: String,
    pub content: String,
    pub sha: String,
    pub branch: String,
}

/// Result of a successful blob write.
#[derive(Debug, Clone)]
pub struct Commit {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeItem>,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
    sha: String,
    #[serde(rename = "type")]
    kind: String,
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    commit: CommitObject,
}

#[derive(Debug, Deserialize)]
struct CommitObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct BranchItem {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: RefObject,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    sha: String,
}

/// GitHub gateway client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    api_base: String,
    token: String,
    committer: Committer,
}

impl GithubClient {
    #[must_use]
    pub fn new(token: impl Into<String>, committer: Committer) -> Self {
        Self {
            api_base: GITHUB_API_BASE_URL.to_string(),
            token: token.into(),
            committer,
        }
    }

    /// Point the client at a different API base (used by tests).
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    #[must_use]
    pub fn committer(&self) -> &Committer {
        &self.committer
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        http_client()
            .request(method, format!("{}{path}", self.api_base))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "patchbay")
    }

    /// Repositories visible to the authenticated user.
    pub async fn list_repos(&self) -> Result<Vec<RepoInfo>, GatewayError> {
        self.get_paged("/user/repos").await
    }

    /// GET a list endpoint, following pagination until a short page.
    async fn get_paged<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, GatewayError> {
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let response = self
                .get(path)
                .query(&[("per_page", PAGE_SIZE.to_string()), ("page", page.to_string())])
                .send()
                .await?;
            let response = check_status(response).await?;
            let batch: Vec<T> = response.json().await?;
            let full_page = batch.len() >= PAGE_SIZE;
            items.extend(batch);
            if !full_page {
                return Ok(items);
            }
            page += 1;
        }
    }

    /// The repository's default branch name.
    pub async fn default_branch(&self, repo: &str) -> Result<String, GatewayError> {
        let response = self.get(&format!("/repos/{repo}")).send().await?;
        let response = check_status(response).await?;
        let repo: RepoResponse = response.json().await?;
        Ok(repo.default_branch)
    }

    /// Recursive blob listing for a branch. Directories are excluded.
    pub async fn list_tree(&self, repo: &str, branch: &str) -> Result<Vec<TreeEntry>, GatewayError> {
        let response = self
            .get(&format!("/repos/{repo}/git/trees/{branch}"))
            .query(&[("recursive", "1")])
            .send()
            .await?;
        let response = check_status(response).await?;
        let tree: TreeResponse = response.json().await?;
        Ok(tree
            .tree
            .into_iter()
            .filter(|item| item.kind == "blob")
            .map(|item| TreeEntry {
                path: item.path,
                sha: item.sha,
                size: item.size,
            })
            .collect())
    }

    /// Fetch a file's current content and revision token.
    pub async fn get_file(
        &self,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<RemoteFile, GatewayError> {
        match self.find_file(repo, path, branch).await? {
            Some(file) => Ok(file),
            None => Err(GatewayError::FileNotFound {
                path: path.to_string(),
            }),
        }
    }

    /// Typed existence check: `None` when the path does not exist on the branch.
    pub async fn find_file(
        &self,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Option<RemoteFile>, GatewayError> {
        let response = self
            .get(&format!("/repos/{repo}/contents/{path}"))
            .query(&[("ref", branch)])
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        let contents: ContentsResponse = response.json().await?;
        let content = decode_content(path, &contents.content)?;
        Ok(Some(RemoteFile {
            path: path.to_string(),
            content,
            sha: contents.sha,
            branch: branch.to_string(),
        }))
    }

    /// Create or update a file with a single commit.
    ///
    /// `prior_sha` must be the revision token of the current content when
    /// updating, and `None` when creating.
    pub async fn put_file(
        &self,
        repo: &str,
        path: &str,
        branch: &str,
        content: &str,
        message: &str,
        prior_sha: Option<&str>,
    ) -> Result<Commit, GatewayError> {
        let mut body = json!({
            "message": message,
            "content": BASE64.encode(content.as_bytes()),
            "branch": branch,
            "committer": {
                "name": self.committer.name,
                "email": self.committer.email,
            },
        });
        if let Some(sha) = prior_sha {
            body["sha"] = json!(sha);
        }

        let response = self
            .request(reqwest::Method::PUT, &format!("/repos/{repo}/contents/{path}"))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if status == reqwest::StatusCode::CONFLICT
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            return Err(GatewayError::WriteConflict {
                path: path.to_string(),
            });
        }
        let response = check_status(response).await?;
        let put: PutContentsResponse = response.json().await?;
        tracing::debug!(repo, path, branch, commit = %put.commit.sha, "blob written");
        Ok(Commit {
            sha: put.commit.sha,
        })
    }

    /// All branch names plus the default branch.
    pub async fn list_branches(
        &self,
        repo: &str,
    ) -> Result<(Vec<String>, String), GatewayError> {
        let default = self.default_branch(repo).await?;
        let branches: Vec<BranchItem> = self.get_paged(&format!("/repos/{repo}/branches")).await?;
        Ok((branches.into_iter().map(|b| b.name).collect(), default))
    }

    /// Head commit sha of a branch.
    pub async fn branch_head(&self, repo: &str, branch: &str) -> Result<String, GatewayError> {
        let response = self
            .get(&format!("/repos/{repo}/git/ref/heads/{branch}"))
            .send()
            .await?;
        let response = check_status(response).await?;
        let reference: RefResponse = response.json().await?;
        Ok(reference.object.sha)
    }

    /// Create a branch pointing at an existing commit (a pointer copy).
    pub async fn create_branch(
        &self,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<(), GatewayError> {
        let response = self
            .request(reqwest::Method::POST, &format!("/repos/{repo}/git/refs"))
            .json(&json!({
                "ref": format!("refs/heads/{branch}"),
                "sha": sha,
            }))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
            return Err(GatewayError::BranchConflict {
                branch: branch.to_string(),
            });
        }
        check_status(response).await?;
        Ok(())
    }
}

/// Map non-success statuses to `GatewayError::Http` with a capped body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = read_capped_body(response).await;
    Err(GatewayError::Http {
        status: status.as_u16(),
        body,
    })
}

async fn read_capped_body(response: reqwest::Response) -> String {
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY_BYTES {
        let mut end = MAX_ERROR_BODY_BYTES;
        while end > 0 && !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...(truncated)");
    }
    body
}

/// Decode the contents API payload: base64 with embedded newlines.
fn decode_content(path: &str, raw: &str) -> Result<String, GatewayError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| GatewayError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|e| GatewayError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
