use crate::backend::base::QueryBackend;
use crate::errors::{AnalystError, AnalystResult};
use crate::models::message::Message;
use crate::models::role::Role;
use crate::providers::base::Assistant;
use crate::render::{ContentRenderer, Element, Rendered};
use crate::state::ConversationState;

/// The outcome of one successful exchange
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    /// Log index of the assistant message, also the scope of its suggestion keys
    pub id: usize,
    pub request_id: Option<String>,
    pub warnings: Vec<String>,
    pub view: Vec<Element>,
    /// Query failures rendered inline in `view`
    pub failures: Vec<AnalystError>,
}

/// One log entry as the shell should draw it
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub index: usize,
    pub role: Role,
    pub view: Vec<Element>,
}

pub struct Orchestrator {
    assistant: Box<dyn Assistant>,
    renderer: ContentRenderer,
}

impl Orchestrator {
    pub fn new(assistant: Box<dyn Assistant>, backend: Box<dyn QueryBackend>) -> Self {
        Self {
            assistant,
            renderer: ContentRenderer::new(backend),
        }
    }

    /// Run one exchange. The user message is in the log before the request goes out and
    /// stays there if the request fails; the assistant message is appended only after a
    /// reply has been received and rendered.
    pub async fn process(
        &self,
        state: &mut ConversationState,
        prompt: &str,
        selector: &str,
    ) -> AnalystResult<Exchange> {
        if prompt.trim().is_empty() {
            return Err(AnalystError::EmptyPrompt);
        }

        state.push(Message::user().with_text(prompt));
        tracing::info!(selector, exchange = state.len(), "processing prompt");

        let reply = self.assistant.send(prompt, selector).await.map_err(|e| {
            tracing::warn!(selector, "analyst request failed: {}", e);
            e
        })?;

        let id = state.len();
        let Rendered { elements, failures } = self.renderer.render(&reply.content, id).await;
        state.push(Message::assistant().with_blocks(reply.content));

        Ok(Exchange {
            id,
            request_id: reply.request_id,
            warnings: reply.warnings,
            view: elements,
            failures,
        })
    }

    /// Feed the clicked suggestion, if any, through `process`. The suggestion is cleared
    /// before the request so a failure cannot replay it.
    pub async fn process_active_suggestion(
        &self,
        state: &mut ConversationState,
        selector: &str,
    ) -> Option<AnalystResult<Exchange>> {
        let prompt = state.take_active_suggestion()?;
        Some(self.process(state, &prompt, selector).await)
    }

    /// Render the whole log from scratch
    pub async fn replay(&self, state: &ConversationState) -> Vec<RenderedMessage> {
        let mut rendered = Vec::with_capacity(state.len());
        for (index, message) in state.messages().iter().enumerate() {
            let view = match message.role {
                Role::User => vec![Element::markdown(message.text())],
                Role::Assistant => self.renderer.render(&message.content, index).await.elements,
            };
            rendered.push(RenderedMessage {
                index,
                role: message.role,
                view,
            });
        }
        rendered
    }
}
