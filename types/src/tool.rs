//! Tool declarations and calls.
//!
//! Declarations use the OpenAI function-calling wire shape so they can be
//! attached to a chat/completions request unchanged. Tool names form a closed
//! set; anything else fails to parse rather than falling into open-ended
//! string dispatch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The four tools the model may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    ReadFile,
    WriteFile,
    EditFile,
    ListFiles,
}

impl ToolName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ToolName::ReadFile => "read_file",
            ToolName::WriteFile => "write_file",
            ToolName::EditFile => "edit_file",
            ToolName::ListFiles => "list_files",
        }
    }

    /// All tool names, in catalog order.
    pub const ALL: [ToolName; 4] = [
        ToolName::ReadFile,
        ToolName::WriteFile,
        ToolName::EditFile,
        ToolName::ListFiles,
    ];
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {name}")]
pub struct UnknownToolError {
    pub name: String,
}

impl FromStr for ToolName {
    type Err = UnknownToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read_file" => Ok(ToolName::ReadFile),
            "write_file" => Ok(ToolName::WriteFile),
            "edit_file" => Ok(ToolName::EditFile),
            "list_files" => Ok(ToolName::ListFiles),
            other => Err(UnknownToolError {
                name: other.to_string(),
            }),
        }
    }
}

/// Function payload of a tool declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    /// JSON schema for the function arguments.
    pub parameters: Value,
}

/// One entry of the tool catalog handed to the completion API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDeclaration {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDeclaration,
}

impl ToolDeclaration {
    #[must_use]
    pub fn function(name: ToolName, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionDeclaration {
                name: name.as_str().to_string(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// A tool invocation as received on the execute-tool endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub arguments: Value,
}
