use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AnalystResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
}

impl Column {
    pub fn new<S: Into<String>, T: Into<String>>(name: S, data_type: T) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Tabular result of one statement: ordered columns, ordered rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell as display text; SQL NULL is empty
    pub fn cell_text(&self, row: usize, column: usize) -> String {
        match self.rows.get(row).and_then(|r| r.get(column)) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Something that can run a SQL statement and hand back the rows
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn execute(&self, statement: &str) -> AnalystResult<QueryResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_text() {
        let result = QueryResult::new(
            vec![Column::new("COUNTRY", "text"), Column::new("MEDALS", "fixed")],
            vec![vec![json!("Canada"), json!("26")], vec![json!("Norway"), Value::Null]],
        );
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.column_count(), 2);
        assert_eq!(result.cell_text(0, 0), "Canada");
        assert_eq!(result.cell_text(0, 1), "26");
        assert_eq!(result.cell_text(1, 1), "");
        assert_eq!(result.cell_text(5, 0), "");
    }
}
