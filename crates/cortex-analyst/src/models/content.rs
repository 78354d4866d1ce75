use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionsContent {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlContent {
    pub statement: String,
    /// Opaque verification details the service may attach to a statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// One typed unit of analyst output
pub enum ContentBlock {
    Text(TextContent),
    Suggestions(SuggestionsContent),
    Sql(SqlContent),
}

impl ContentBlock {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentBlock::Text(TextContent { text: text.into() })
    }

    pub fn suggestions<I, S>(suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ContentBlock::Suggestions(SuggestionsContent {
            suggestions: suggestions.into_iter().map(Into::into).collect(),
        })
    }

    pub fn sql<S: Into<String>>(statement: S) -> Self {
        ContentBlock::Sql(SqlContent {
            statement: statement.into(),
            confidence: None,
        })
    }

    /// Get the text if this is a Text block
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(text) => Some(&text.text),
            _ => None,
        }
    }

    /// Get the suggestion list if this is a Suggestions block
    pub fn as_suggestions(&self) -> Option<&[String]> {
        match self {
            ContentBlock::Suggestions(content) => Some(&content.suggestions),
            _ => None,
        }
    }

    /// Get the statement if this is a Sql block
    pub fn as_sql(&self) -> Option<&str> {
        match self {
            ContentBlock::Sql(sql) => Some(&sql.statement),
            _ => None,
        }
    }
}
