use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AnalystResult;
use crate::models::content::ContentBlock;

/// What the analyst service said in reply to one prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub request_id: Option<String>,
    pub content: Vec<ContentBlock>,
    pub warnings: Vec<String>,
}

impl AssistantReply {
    pub fn new(content: Vec<ContentBlock>) -> Self {
        Self {
            request_id: None,
            content,
            warnings: Vec::new(),
        }
    }
}

/// Base trait for natural-language-to-SQL assistants
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Ask a single question grounded in the semantic model named by `selector`.
    /// Implementations make exactly one attempt.
    async fn send(&self, prompt: &str, selector: &str) -> AnalystResult<AssistantReply>;
}
