//! Tool catalog, conversation composer, and the tool-call dispatcher.
//!
//! The dispatcher is the heart of the system: it maps an abstract tool
//! invocation (name + arguments + repository context) onto a concrete,
//! single-file mutation of the remote store, fetching fresh content and its
//! revision token immediately before every edit and committing the result.

pub mod catalog;
pub mod compose;
pub mod dispatch;

pub use catalog::tool_catalog;
pub use compose::{ComposedTurn, compose};
pub use dispatch::{ToolError, ToolReport, execute};
