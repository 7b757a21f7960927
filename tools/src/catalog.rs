//! Static tool catalog, parameterized by the active repository context.
//!
//! Pure function of the context: no side effects, no remote calls. The
//! active repository and branch are embedded in each description so the
//! model knows its operating target without extra turns.

use patchbay_types::{RepoContext, ToolDeclaration, ToolName};
use serde_json::json;

/// Build the four tool declarations for a chat turn.
#[must_use]
pub fn tool_catalog(context: &RepoContext) -> Vec<ToolDeclaration> {
    let target = format!(
        "repository '{}' on branch '{}'",
        context.repository, context.branch
    );

    vec![
        ToolDeclaration::function(
            ToolName::ReadFile,
            format!("Read the current content of a file from {target}."),
            json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "Path of the file to read, relative to the repository root",
                    },
                },
                "required": ["file_path"],
            }),
        ),
        ToolDeclaration::function(
            ToolName::WriteFile,
            format!(
                "Create a file or fully overwrite an existing one in {target}. \
                 Each call commits the new content as a single commit."
            ),
            json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "Path of the file to write",
                    },
                    "content": {
                        "type": "string",
                        "description": "Complete new file content",
                    },
                    "commit_message": {
                        "type": "string",
                        "description": "Commit message for this write",
                    },
                },
                "required": ["file_path", "content", "commit_message"],
            }),
        ),
        ToolDeclaration::function(
            ToolName::EditFile,
            format!(
                "Replace an exact text fragment in a file in {target}. old_text must \
                 match the file content literally. By default only the first occurrence \
                 is replaced; set replace_all to true to replace every occurrence. \
                 Each call commits the edit as a single commit."
            ),
            json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "Path of the file to edit",
                    },
                    "old_text": {
                        "type": "string",
                        "description": "Exact text to find in the file",
                    },
                    "new_text": {
                        "type": "string",
                        "description": "Replacement text",
                    },
                    "commit_message": {
                        "type": "string",
                        "description": "Commit message for this edit",
                    },
                    "replace_all": {
                        "type": "boolean",
                        "description": "Replace every occurrence instead of only the first",
                        "default": false,
                    },
                },
                "required": ["file_path", "old_text", "new_text", "commit_message"],
            }),
        ),
        ToolDeclaration::function(
            ToolName::ListFiles,
            format!("List every file path in {target}."),
            json!({
                "type": "object",
                "properties": {},
            }),
        ),
    ]
}
