use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::base::{QueryBackend, QueryResult};
use crate::errors::{AnalystError, AnalystResult};

/// A mock backend answering statements from a fixed table and counting executions
#[derive(Default)]
pub struct MockBackend {
    results: HashMap<String, AnalystResult<QueryResult>>,
    pub executed: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result<S: Into<String>>(mut self, statement: S, result: QueryResult) -> Self {
        self.results.insert(statement.into(), Ok(result));
        self
    }

    pub fn with_error<S: Into<String>, M: Into<String>>(mut self, statement: S, message: M) -> Self {
        self.results
            .insert(statement.into(), Err(AnalystError::BackendQuery(message.into())));
        self
    }
}

#[async_trait]
impl QueryBackend for MockBackend {
    async fn execute(&self, statement: &str) -> AnalystResult<QueryResult> {
        self.executed.lock().unwrap().push(statement.to_string());
        self.results.get(statement).cloned().unwrap_or_else(|| {
            Err(AnalystError::BackendQuery(format!(
                "no mock result for '{}'",
                statement
            )))
        })
    }
}
