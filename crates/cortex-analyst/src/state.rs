use crate::errors::{AnalystError, AnalystResult};
use crate::models::message::Message;
use crate::models::role::Role;
use crate::render::SuggestionKey;

/// Per-session conversation state: the chat log and the suggestion last clicked.
///
/// One value per session. Nothing here is global, so two sessions never see each
/// other's history.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
    active_suggestion: Option<String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Record a click on the suggestion behind `key`
    pub fn click(&mut self, key: SuggestionKey) -> AnalystResult<&str> {
        let label = self
            .messages
            .get(key.exchange)
            .filter(|m| m.role == Role::Assistant)
            .and_then(|m| m.suggestions().nth(key.index))
            .cloned()
            .ok_or_else(|| AnalystError::UnknownSuggestion(key.to_string()))?;

        Ok(self.active_suggestion.insert(label).as_str())
    }

    pub fn active_suggestion(&self) -> Option<&str> {
        self.active_suggestion.as_deref()
    }

    /// Read and clear the active suggestion
    pub fn take_active_suggestion(&mut self) -> Option<String> {
        self.active_suggestion.take()
    }

    /// End of session: drop the log and any pending suggestion
    pub fn clear(&mut self) {
        self.messages.clear();
        self.active_suggestion = None;
    }
}
