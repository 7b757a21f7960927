//! HTTP route handlers.
//!
//! JSON in, JSON out, no schema versioning. Handlers stay thin: validate the
//! request, call into the relay/gateway/dispatcher crates, map errors through
//! [`ApiError`].

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use patchbay_github::select_repository;
use patchbay_providers::CompletionRequest;
use patchbay_tools::{compose, execute};
use patchbay_types::{ChatMessage, MODEL_CATALOG, RepoContext};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/models", get(get_models))
        .route("/api/chat", post(chat))
        .route("/api/execute_tool", post(execute_tool))
        .route("/api/github/repos", get(list_repos))
        .route("/api/github/repo/{owner}/{repo}/tree", get(repo_tree))
        .route("/api/github/repo/select", post(select_repo))
        .route("/api/github/file", get(get_file).post(write_file))
        .route("/api/github/branches", get(branches))
        .with_state(state)
}

async fn get_models() -> Json<Value> {
    Json(json!({"models": MODEL_CATALOG}))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    #[serde(default)]
    messages: Vec<ChatMessage>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    repo_context: Option<RepoContext>,
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.model.is_empty() || request.messages.is_empty() {
        return Err(ApiError::bad_request("Model and messages are required"));
    }

    let turn = compose(request.messages, request.repo_context.as_ref());
    let tools = (!turn.tools.is_empty()).then_some(turn.tools.as_slice());
    let body = state
        .completion()?
        .complete(CompletionRequest {
            model: &request.model,
            messages: &turn.messages,
            tools,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        })
        .await?;
    Ok(Json(body))
}

#[derive(Debug, Deserialize)]
struct ExecuteToolRequest {
    tool_name: String,
    #[serde(default)]
    arguments: Value,
    repo_context: Option<RepoContext>,
}

async fn execute_tool(
    State(state): State<AppState>,
    Json(request): Json<ExecuteToolRequest>,
) -> Response {
    let result = run_tool(&state, &request).await;
    match result {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => err.into_tool_response(),
    }
}

async fn run_tool(state: &AppState, request: &ExecuteToolRequest) -> Result<Value, ApiError> {
    let Some(context) = request.repo_context.as_ref() else {
        return Err(ApiError::bad_request("repo_context is required"));
    };
    let github = state.github()?;
    let report = execute(&request.tool_name, &request.arguments, context, github).await?;
    Ok(report.to_json())
}

async fn list_repos(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let repos = state.github()?.list_repos().await?;
    Ok(Json(json!({"repos": repos})))
}

#[derive(Debug, Deserialize)]
struct BranchQuery {
    branch: Option<String>,
}

async fn repo_tree(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<BranchQuery>,
) -> Result<Json<Value>, ApiError> {
    let github = state.github()?;
    let repo = format!("{owner}/{repo}");
    let branch = match query.branch {
        Some(branch) => branch,
        None => github.default_branch(&repo).await?,
    };
    let files = github.list_tree(&repo, &branch).await?;
    Ok(Json(json!({
        "files": files,
        "branch": branch,
        "repo": repo,
    })))
}

#[derive(Debug, Deserialize)]
struct SelectRepoRequest {
    repo: String,
    base_branch: Option<String>,
}

async fn select_repo(
    State(state): State<AppState>,
    Json(request): Json<SelectRepoRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.repo.is_empty() {
        return Err(ApiError::bad_request("repo is required"));
    }
    let provisioned = select_repository(
        state.github()?,
        &request.repo,
        request.base_branch.as_deref(),
    )
    .await?;
    Ok(Json(json!({
        "branch": provisioned.branch,
        "base_branch": provisioned.base_branch,
        "files": provisioned.files,
    })))
}

#[derive(Debug, Deserialize)]
struct FileQuery {
    repo: Option<String>,
    path: Option<String>,
    branch: Option<String>,
}

async fn get_file(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Json<Value>, ApiError> {
    let github = state.github()?;
    let (Some(repo), Some(path)) = (query.repo, query.path) else {
        return Err(ApiError::bad_request("repo and path are required"));
    };
    let branch = match query.branch {
        Some(branch) => branch,
        None => github.default_branch(&repo).await?,
    };
    let file = github.get_file(&repo, &path, &branch).await?;
    Ok(Json(json!({
        "content": file.content,
        "path": file.path,
        "sha": file.sha,
        "branch": file.branch,
    })))
}

#[derive(Debug, Deserialize)]
struct WriteFileRequest {
    repo: Option<String>,
    path: Option<String>,
    content: Option<String>,
    branch: Option<String>,
    message: Option<String>,
}

async fn write_file(
    State(state): State<AppState>,
    Json(request): Json<WriteFileRequest>,
) -> Result<Json<Value>, ApiError> {
    let github = state.github()?;
    let (Some(repo), Some(path), Some(content), Some(branch)) = (
        request.repo,
        request.path,
        request.content,
        request.branch,
    ) else {
        return Err(ApiError::bad_request(
            "repo, path, content, and branch are required",
        ));
    };
    let message = request
        .message
        .unwrap_or_else(|| format!("Update {path}"));

    let existing = github.find_file(&repo, &path, &branch).await?;
    let commit = github
        .put_file(
            &repo,
            &path,
            &branch,
            &content,
            &message,
            existing.as_ref().map(|f| f.sha.as_str()),
        )
        .await?;
    Ok(Json(json!({
        "success": true,
        "commit": commit.sha,
        "message": "File updated successfully",
    })))
}

#[derive(Debug, Deserialize)]
struct RepoQuery {
    repo: Option<String>,
}

async fn branches(
    State(state): State<AppState>,
    Query(query): Query<RepoQuery>,
) -> Result<Json<Value>, ApiError> {
    let github = state.github()?;
    let Some(repo) = query.repo else {
        return Err(ApiError::bad_request("repo is required"));
    };
    let (branches, default_branch) = github.list_branches(&repo).await?;
    Ok(Json(json!({
        "branches": branches,
        "default_branch": default_branch,
    })))
}
