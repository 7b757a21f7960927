//! Conversation composer.
//!
//! Builds the outbound message list for a chat turn. With a repository
//! context attached, the turn gets a system-priming message of editing
//! guidelines (unless the client already leads with a system message) and
//! the tool catalog for that context. Without one, the turn passes through
//! untouched and carries no tools.

use patchbay_types::{ChatMessage, RepoContext, Role, ToolDeclaration};

use crate::catalog::tool_catalog;

/// Fixed editing guidelines prepended to repository-backed conversations.
pub const EDITING_GUIDELINES: &str = "\
You are a careful coding assistant that edits files in a version-controlled \
repository through the provided tools. The repository and branch you operate \
on are named in each tool description.

Guidelines:
- Read a file once with read_file before editing it; do not re-read unless an edit failed.
- edit_file replaces literal text. old_text must match the file byte for byte, \
including whitespace and indentation.
- For a change repeated in many places, make one edit_file call with replace_all \
set to true instead of one call per occurrence.
- Use write_file only to create a new file or fully rewrite one.
- Plan the complete set of edits before making the first one.
- Every write_file or edit_file call produces one commit; keep the number of \
tool calls per task small (around a dozen at most).";

/// A chat turn ready to relay upstream.
#[derive(Debug, Clone)]
pub struct ComposedTurn {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDeclaration>,
}

/// Compose a turn for the given repository context.
///
/// Idempotent: whether a system message is prepended is decided purely by the
/// role of the first message, so re-composing an already-composed list never
/// duplicates the priming message.
#[must_use]
pub fn compose(messages: Vec<ChatMessage>, context: Option<&RepoContext>) -> ComposedTurn {
    let Some(context) = context else {
        return ComposedTurn {
            messages,
            tools: Vec::new(),
        };
    };

    let needs_priming = messages.first().is_none_or(|m| m.role != Role::System);
    let messages = if needs_priming {
        let mut primed = Vec::with_capacity(messages.len() + 1);
        primed.push(ChatMessage::system(EDITING_GUIDELINES));
        primed.extend(messages);
        primed
    } else {
        messages
    };

    ComposedTurn {
        messages,
        tools: tool_catalog(context),
    }
}
