use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::{Assistant, AssistantReply};
use super::configs::CortexAnalystConfig;
use crate::errors::{AnalystError, AnalystResult};
use crate::models::content::ContentBlock;

pub const ANALYST_MESSAGE_PATH: &str = "/api/v2/cortex/analyst/message";

#[derive(Debug, Deserialize)]
struct AnalystResponse {
    message: AnalystMessage,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    warnings: Vec<AnalystWarning>,
}

#[derive(Debug, Deserialize)]
struct AnalystMessage {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnalystWarning {
    message: String,
}

pub struct CortexAnalyst {
    client: Client,
    config: CortexAnalystConfig,
}

impl CortexAnalyst {
    pub fn new(config: CortexAnalystConfig) -> AnalystResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Build the message payload for a single user question
    pub fn request_body(&self, prompt: &str, selector: &str) -> AnalystResult<Value> {
        let semantic_model_file = self.config.catalog.resolve(selector)?;

        Ok(json!({
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": prompt
                        }
                    ]
                }
            ],
            "semantic_model_file": semantic_model_file,
        }))
    }

    async fn post(&self, payload: &Value) -> AnalystResult<String> {
        let url = format!(
            "{}{}",
            self.config.host.trim_end_matches('/'),
            ANALYST_MESSAGE_PATH
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth.bearer())
            .header(
                "X-Snowflake-Authorization-Token-Type",
                self.config.auth.token_type.header_value(),
            )
            .header("Accept", "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() < 400 {
            Ok(body)
        } else {
            Err(AnalystError::RemoteService {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl Assistant for CortexAnalyst {
    async fn send(&self, prompt: &str, selector: &str) -> AnalystResult<AssistantReply> {
        if prompt.trim().is_empty() {
            return Err(AnalystError::EmptyPrompt);
        }

        let payload = self.request_body(prompt, selector)?;
        tracing::debug!(
            semantic_model_file = %payload["semantic_model_file"],
            "sending analyst request"
        );

        let body = self.post(&payload).await?;
        let response: AnalystResponse = serde_json::from_str(&body)
            .map_err(|e| AnalystError::InvalidResponse(e.to_string()))?;

        let warnings: Vec<String> = response.warnings.into_iter().map(|w| w.message).collect();
        for warning in &warnings {
            tracing::warn!(request_id = ?response.request_id, "analyst warning: {}", warning);
        }

        Ok(AssistantReply {
            request_id: response.request_id,
            content: response.message.content,
            warnings,
        })
    }
}
