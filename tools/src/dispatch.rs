//! Tool-call dispatcher.
//!
//! Executes one tool invocation against the remote repository gateway. Each
//! call is self-contained: arguments are validated before any remote call,
//! file content and its revision token are fetched immediately before a
//! mutation, and every successful mutation produces exactly one commit.
//!
//! The fetch-then-persist sequence is not transactional; a concurrent
//! external edit between the two steps is caught only by the remote store
//! rejecting the stale revision token.

use patchbay_github::{GatewayError, GithubClient};
use patchbay_types::{RepoContext, ToolName, UnknownToolError};
use serde::Deserialize;
use serde_json::{Value, json};

/// Failures of a whole tool call.
///
/// A missing `old_text` match is deliberately not here: it is a normal
/// outcome reported through [`ToolReport::TextNotFound`] so the conversation
/// loop can feed it back to the model for a corrected retry.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: &'static str, message: String },
    #[error(transparent)]
    UnknownTool(#[from] UnknownToolError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Structured outcome of a tool call, fed back to the model as a tool result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolReport {
    FileRead {
        path: String,
        content: String,
    },
    FileWritten {
        path: String,
        commit: String,
        created: bool,
    },
    FileEdited {
        path: String,
        commit: String,
        /// Occurrence count of `old_text`, computed on the pre-substitution
        /// content.
        occurrences: usize,
        replaced_all: bool,
    },
    /// `old_text` was absent. Soft failure: no write happened.
    TextNotFound {
        path: String,
    },
    FileList {
        files: Vec<String>,
    },
}

impl ToolReport {
    #[must_use]
    pub fn success(&self) -> bool {
        !matches!(self, ToolReport::TextNotFound { .. })
    }

    /// Human-readable summary, distinguishing "all N occurrences" from
    /// "1 occurrence" for edits.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            ToolReport::FileRead { path, .. } => format!("Read {path}"),
            ToolReport::FileWritten {
                path,
                created: true,
                ..
            } => format!("Created {path}"),
            ToolReport::FileWritten { path, .. } => format!("Updated {path}"),
            ToolReport::FileEdited {
                path,
                occurrences,
                replaced_all: true,
                ..
            } => format!("Replaced all {occurrences} occurrences in {path}"),
            ToolReport::FileEdited { path, .. } => format!("Replaced 1 occurrence in {path}"),
            ToolReport::TextNotFound { path } => format!("Text not found in {path}"),
            ToolReport::FileList { files } => format!("Listed {} files", files.len()),
        }
    }

    /// Wire shape for the execute-tool endpoint and tool-result messages.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            ToolReport::FileRead { path, content } => json!({
                "success": true,
                "path": path,
                "content": content,
            }),
            ToolReport::FileWritten {
                path,
                commit,
                created,
            } => json!({
                "success": true,
                "path": path,
                "commit": commit,
                "created": created,
                "message": self.summary(),
            }),
            ToolReport::FileEdited { path, commit, .. } => json!({
                "success": true,
                "path": path,
                "commit": commit,
                "replaced": self.replaced_phrase(),
                "message": self.summary(),
            }),
            ToolReport::TextNotFound { path } => json!({
                "success": false,
                "path": path,
                "error": "text not found",
            }),
            ToolReport::FileList { files } => json!({
                "success": true,
                "files": files,
            }),
        }
    }

    fn replaced_phrase(&self) -> String {
        match self {
            ToolReport::FileEdited {
                occurrences,
                replaced_all: true,
                ..
            } => format!("all {occurrences} occurrences"),
            _ => "1 occurrence".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReadFileArgs {
    file_path: String,
}

#[derive(Debug, Deserialize)]
struct WriteFileArgs {
    file_path: String,
    content: String,
    commit_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EditFileArgs {
    file_path: String,
    old_text: String,
    new_text: String,
    commit_message: Option<String>,
    #[serde(default)]
    replace_all: bool,
}

fn parse_args<T: serde::de::DeserializeOwned>(
    tool: &'static str,
    args: &Value,
) -> Result<T, ToolError> {
    serde_json::from_value(args.clone()).map_err(|e| ToolError::InvalidArguments {
        tool,
        message: e.to_string(),
    })
}

/// Execute one tool call against the repository named by `context`.
pub async fn execute(
    tool_name: &str,
    arguments: &Value,
    context: &RepoContext,
    gateway: &GithubClient,
) -> Result<ToolReport, ToolError> {
    let tool: ToolName = tool_name.parse()?;
    tracing::info!(
        tool = %tool,
        repository = %context.repository,
        branch = %context.branch,
        "dispatching tool call"
    );

    match tool {
        ToolName::ReadFile => read_file(arguments, context, gateway).await,
        ToolName::WriteFile => write_file(arguments, context, gateway).await,
        ToolName::EditFile => edit_file(arguments, context, gateway).await,
        ToolName::ListFiles => list_files(context, gateway).await,
    }
}

async fn read_file(
    arguments: &Value,
    context: &RepoContext,
    gateway: &GithubClient,
) -> Result<ToolReport, ToolError> {
    let args: ReadFileArgs = parse_args("read_file", arguments)?;
    let file = gateway
        .get_file(&context.repository, &args.file_path, &context.branch)
        .await?;
    Ok(ToolReport::FileRead {
        path: file.path,
        content: file.content,
    })
}

async fn write_file(
    arguments: &Value,
    context: &RepoContext,
    gateway: &GithubClient,
) -> Result<ToolReport, ToolError> {
    let args: WriteFileArgs = parse_args("write_file", arguments)?;
    let message = args
        .commit_message
        .unwrap_or_else(|| format!("Update {}", args.file_path));

    // Explicit exists?update:create decision; the revision token comes from
    // the fetch made within this call, never from a cache.
    let existing = gateway
        .find_file(&context.repository, &args.file_path, &context.branch)
        .await?;
    let prior_sha = existing.as_ref().map(|f| f.sha.as_str());

    let commit = gateway
        .put_file(
            &context.repository,
            &args.file_path,
            &context.branch,
            &args.content,
            &message,
            prior_sha,
        )
        .await?;
    Ok(ToolReport::FileWritten {
        path: args.file_path,
        commit: commit.sha,
        created: existing.is_none(),
    })
}

async fn edit_file(
    arguments: &Value,
    context: &RepoContext,
    gateway: &GithubClient,
) -> Result<ToolReport, ToolError> {
    let args: EditFileArgs = parse_args("edit_file", arguments)?;
    if args.old_text.is_empty() {
        return Err(ToolError::InvalidArguments {
            tool: "edit_file",
            message: "old_text must not be empty".to_string(),
        });
    }

    // Editing nonexistent content is fatal, unlike write_file's create path.
    let file = gateway
        .get_file(&context.repository, &args.file_path, &context.branch)
        .await?;

    let Some(edit) = replace_literal(&file.content, &args.old_text, &args.new_text, args.replace_all)
    else {
        tracing::debug!(path = %args.file_path, "old_text not found, no write issued");
        return Ok(ToolReport::TextNotFound {
            path: args.file_path,
        });
    };

    let message = args
        .commit_message
        .unwrap_or_else(|| format!("Edit {}", args.file_path));
    let commit = gateway
        .put_file(
            &context.repository,
            &args.file_path,
            &context.branch,
            &edit.content,
            &message,
            Some(&file.sha),
        )
        .await?;
    Ok(ToolReport::FileEdited {
        path: args.file_path,
        commit: commit.sha,
        occurrences: edit.occurrences,
        replaced_all: args.replace_all,
    })
}

async fn list_files(
    context: &RepoContext,
    gateway: &GithubClient,
) -> Result<ToolReport, ToolError> {
    let tree = gateway
        .list_tree(&context.repository, &context.branch)
        .await?;
    Ok(ToolReport::FileList {
        files: tree.into_iter().map(|entry| entry.path).collect(),
    })
}

struct LiteralEdit {
    content: String,
    /// Non-overlapping occurrence count, computed before substitution.
    occurrences: usize,
}

/// Literal, single-pass substring replacement.
///
/// Returns `None` when `needle` is absent. Occurrences are counted on the
/// input: replacing `"a"` with `"aa"` does not re-match the inserted text,
/// and repeated application is therefore not idempotent.
fn replace_literal(
    haystack: &str,
    needle: &str,
    replacement: &str,
    all: bool,
) -> Option<LiteralEdit> {
    let occurrences = haystack.matches(needle).count();
    if occurrences == 0 {
        return None;
    }
    let content = if all {
        haystack.replace(needle, replacement)
    } else {
        haystack.replacen(needle, replacement, 1)
    };
    Some(LiteralEdit {
        content,
        occurrences,
    })
}

#[cfg(test)]
mod tests {
    use super::{ToolReport, replace_literal};

    #[test]
    fn single_occurrence_replaced_exactly() {
        let edit = replace_literal("color: #fff;", "#fff", "#000", false).unwrap();
        assert_eq!(edit.content, "color: #000;");
        assert_eq!(edit.occurrences, 1);
    }

    #[test]
    fn replace_all_hits_every_occurrence() {
        let edit = replace_literal("#fff #fff #fff", "#fff", "#000", true).unwrap();
        assert_eq!(edit.content, "#000 #000 #000");
        assert_eq!(edit.occurrences, 3);
    }

    #[test]
    fn single_mode_replaces_only_leftmost() {
        let edit = replace_literal("#fff #fff #fff", "#fff", "#000", false).unwrap();
        assert_eq!(edit.content, "#000 #fff #fff");
        assert_eq!(edit.occurrences, 3);
    }

    #[test]
    fn absent_needle_yields_none() {
        assert!(replace_literal("body {}", "#fff", "#000", true).is_none());
    }

    #[test]
    fn substitution_is_single_pass_not_recursive() {
        // Replacing "a" with "aa" must not re-match inserted text.
        let edit = replace_literal("aba", "a", "aa", true).unwrap();
        assert_eq!(edit.content, "aabaa");
        assert_eq!(edit.occurrences, 2);
    }

    #[test]
    fn occurrence_count_is_non_overlapping() {
        let edit = replace_literal("aaaa", "aa", "x", true).unwrap();
        assert_eq!(edit.occurrences, 2);
        assert_eq!(edit.content, "xx");
    }

    #[test]
    fn match_is_byte_exact_no_normalization() {
        assert!(replace_literal("color:\u{a0}#fff", "color: #fff", "x", false).is_none());
        assert!(replace_literal("Color: #FFF", "color: #fff", "x", false).is_none());
    }

    #[test]
    fn edited_report_distinguishes_all_from_one() {
        let all = ToolReport::FileEdited {
            path: "a.css".to_string(),
            commit: "c1".to_string(),
            occurrences: 3,
            replaced_all: true,
        };
        assert_eq!(all.to_json()["replaced"], "all 3 occurrences");
        assert_eq!(all.summary(), "Replaced all 3 occurrences in a.css");

        let one = ToolReport::FileEdited {
            path: "a.css".to_string(),
            commit: "c1".to_string(),
            occurrences: 3,
            replaced_all: false,
        };
        assert_eq!(one.to_json()["replaced"], "1 occurrence");
    }

    #[test]
    fn text_not_found_report_is_soft_failure() {
        let report = ToolReport::TextNotFound {
            path: "a.css".to_string(),
        };
        assert!(!report.success());
        let json = report.to_json();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "text not found");
    }
}
