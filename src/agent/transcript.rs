//! Append-only conversation log.

use crate::llm::{ChatMessage, Role};

/// The conversation as sent to the model, oldest turn first.
///
/// Turns can only be appended; nothing is ever removed or reordered, since
/// the whole log is resent on every request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript opening with a system turn.
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut transcript = Self::new();
        transcript.push(ChatMessage::system(prompt));
        transcript
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::user(content));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Call ids requested by assistant turns that no tool turn has answered
    /// yet, in request order.
    pub fn pending_tool_calls(&self) -> Vec<&str> {
        let mut pending: Vec<&str> = Vec::new();
        for message in &self.messages {
            match message.role {
                Role::Assistant => {
                    pending.extend(message.requested_tool_calls().iter().map(|c| c.id.as_str()));
                }
                Role::Tool => {
                    if let Some(id) = message.tool_call_id.as_deref() {
                        if let Some(pos) = pending.iter().position(|p| *p == id) {
                            pending.remove(pos);
                        }
                    }
                }
                Role::System | Role::User => {}
            }
        }
        pending
    }
}

impl Extend<ChatMessage> for Transcript {
    fn extend<T: IntoIterator<Item = ChatMessage>>(&mut self, iter: T) {
        self.messages.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ToolCall;

    #[test]
    fn preserves_insertion_order() {
        let mut transcript = Transcript::with_system_prompt("system");
        transcript.push_user("hello");
        transcript.push(ChatMessage::assistant(Some("hi".to_string()), None));

        let roles: Vec<_> = transcript.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(transcript.last().unwrap().text_content(), "hi");
    }

    #[test]
    fn pending_calls_track_answers() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::assistant(
            None,
            Some(vec![
                ToolCall::new("a", "search_users", "{}"),
                ToolCall::new("b", "add_user", "{}"),
            ]),
        ));
        assert_eq!(transcript.pending_tool_calls(), vec!["a", "b"]);

        transcript.push(ChatMessage::tool("a", "search_users", "Found 0 users:\n"));
        assert_eq!(transcript.pending_tool_calls(), vec!["b"]);

        transcript.push(ChatMessage::tool("b", "add_user", "ok"));
        assert!(transcript.pending_tool_calls().is_empty());
    }

    #[test]
    fn unmatched_tool_turn_is_ignored() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::tool("ghost", "delete_user", "?"));
        assert!(transcript.pending_tool_calls().is_empty());
        assert_eq!(transcript.len(), 1);
    }
}
