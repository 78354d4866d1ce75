use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use super::base::{Column, QueryBackend, QueryResult};
use crate::errors::{AnalystError, AnalystResult};
use crate::providers::configs::SnowflakeSqlConfig;

pub const STATEMENTS_PATH: &str = "/api/v2/statements";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementResponse {
    #[serde(default)]
    statement_handle: Option<String>,
    #[serde(default)]
    result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultSetMetaData {
    #[serde(default)]
    row_type: Vec<RowType>,
    #[serde(default)]
    partition_info: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RowType {
    name: String,
    #[serde(rename = "type", default)]
    data_type: String,
}

/// Runs statements through the Snowflake SQL REST API
pub struct SnowflakeSql {
    client: Client,
    config: SnowflakeSqlConfig,
}

impl SnowflakeSql {
    pub fn new(config: SnowflakeSqlConfig) -> AnalystResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.host.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", self.config.auth.bearer())
            .header(
                "X-Snowflake-Authorization-Token-Type",
                self.config.auth.token_type.header_value(),
            )
            .header("Accept", "application/json")
    }

    pub fn request_body(&self, statement: &str) -> Value {
        let mut body = Map::new();
        body.insert("statement".to_string(), json!(statement));
        body.insert(
            "timeout".to_string(),
            json!(self.config.timeout_ms.div_ceil(1000)),
        );

        let context = [
            ("database", &self.config.database),
            ("schema", &self.config.schema),
            ("warehouse", &self.config.warehouse),
            ("role", &self.config.role),
        ];
        for (key, value) in context {
            if let Some(value) = value {
                body.insert(key.to_string(), json!(value));
            }
        }

        Value::Object(body)
    }

    /// Send one request; 200 and 202 both come back for the caller to tell apart
    async fn read(&self, request: RequestBuilder) -> AnalystResult<(StatusCode, StatementResponse)> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| AnalystError::BackendQuery(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalystError::BackendQuery(e.to_string()))?;

        if status != StatusCode::OK && status != StatusCode::ACCEPTED {
            return Err(AnalystError::BackendQuery(error_message(status, &body)));
        }

        let parsed: StatementResponse = serde_json::from_str(&body)
            .map_err(|e| AnalystError::BackendQuery(format!("unreadable result: {}", e)))?;
        Ok((status, parsed))
    }

    async fn wait_for_result(
        &self,
        deadline: Instant,
        mut status: StatusCode,
        mut response: StatementResponse,
    ) -> AnalystResult<StatementResponse> {
        while status == StatusCode::ACCEPTED {
            let handle = response.statement_handle.clone().ok_or_else(|| {
                AnalystError::BackendQuery("statement accepted without a handle".to_string())
            })?;
            if Instant::now() >= deadline {
                return Err(AnalystError::BackendQuery(format!(
                    "statement {} did not finish within {} ms",
                    handle, self.config.timeout_ms
                )));
            }

            sleep(POLL_INTERVAL).await;
            tracing::debug!(%handle, "polling statement status");
            let url = self.url(&format!("{}/{}", STATEMENTS_PATH, handle));
            (status, response) = self.read(self.client.get(&url)).await?;
        }

        Ok(response)
    }

    async fn fetch_partition(&self, handle: &str, partition: usize) -> AnalystResult<Vec<Vec<Value>>> {
        let url = self.url(&format!("{}/{}", STATEMENTS_PATH, handle));
        let request = self
            .client
            .get(&url)
            .query(&[("partition", partition.to_string())]);
        let (_, response) = self.read(request).await?;
        Ok(response.data)
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string());
    format!("{}: {}", status, message)
}

#[async_trait]
impl QueryBackend for SnowflakeSql {
    async fn execute(&self, statement: &str) -> AnalystResult<QueryResult> {
        tracing::debug!(statement, "executing statement");
        let deadline = Instant::now() + Duration::from_millis(self.config.timeout_ms);

        let request = self
            .client
            .post(self.url(STATEMENTS_PATH))
            .json(&self.request_body(statement));
        let (status, response) = self.read(request).await?;
        let response = self.wait_for_result(deadline, status, response).await?;

        let meta = response.result_set_meta_data.ok_or_else(|| {
            AnalystError::BackendQuery("result is missing resultSetMetaData".to_string())
        })?;
        let columns = meta
            .row_type
            .into_iter()
            .map(|r| Column::new(r.name, r.data_type))
            .collect();

        let mut rows = response.data;
        if meta.partition_info.len() > 1 {
            let handle = response.statement_handle.ok_or_else(|| {
                AnalystError::BackendQuery("partitioned result without a handle".to_string())
            })?;
            for partition in 1..meta.partition_info.len() {
                rows.extend(self.fetch_partition(&handle, partition).await?);
            }
        }

        Ok(QueryResult::new(columns, rows))
    }
}
