//! Core domain types for Patchbay.
//!
//! This crate holds the wire-level and domain types shared by every other
//! crate in the workspace: conversation messages, the repository context
//! attached to chat turns and tool executions, tool declarations and calls,
//! and the static model catalog. No IO, no async.

pub mod message;
pub mod model;
pub mod repo;
pub mod tool;

pub use message::{ChatMessage, Role};
pub use model::{MODEL_CATALOG, ModelInfo};
pub use repo::RepoContext;
pub use tool::{FunctionDeclaration, ToolCall, ToolDeclaration, ToolName, UnknownToolError};
