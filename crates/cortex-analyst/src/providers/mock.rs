use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;

use super::base::{Assistant, AssistantReply};
use crate::errors::AnalystResult;

/// A mock assistant that returns pre-configured replies and records what it was asked
pub struct MockAssistant {
    replies: Arc<Mutex<Vec<AnalystResult<AssistantReply>>>>,
    pub requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAssistant {
    /// Create a new mock assistant with a sequence of replies
    pub fn new(replies: Vec<AnalystResult<AssistantReply>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Assistant for MockAssistant {
    async fn send(&self, prompt: &str, selector: &str) -> AnalystResult<AssistantReply> {
        self.requests
            .lock()
            .unwrap()
            .push((prompt.to_string(), selector.to_string()));

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Return an empty reply if no more pre-configured replies
            Ok(AssistantReply::new(Vec::new()))
        } else {
            replies.remove(0)
        }
    }
}
