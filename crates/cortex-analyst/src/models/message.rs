use super::content::ContentBlock;
use super::role::Role;
use chrono::Utc;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
/// A message to or from the analyst service
pub struct Message {
    pub role: Role,
    pub created: i64,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a new user message with the current timestamp
    pub fn user() -> Self {
        Message {
            role: Role::User,
            created: Utc::now().timestamp(),
            content: Vec::new(),
        }
    }

    /// Create a new assistant message with the current timestamp
    pub fn assistant() -> Self {
        Message {
            role: Role::Assistant,
            created: Utc::now().timestamp(),
            content: Vec::new(),
        }
    }

    /// Add any ContentBlock to the message
    pub fn with_content(mut self, content: ContentBlock) -> Self {
        self.content.push(content);
        self
    }

    /// Add text content to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_content(ContentBlock::text(text))
    }

    /// Append blocks in the order given
    pub fn with_blocks(mut self, blocks: impl IntoIterator<Item = ContentBlock>) -> Self {
        self.content.extend(blocks);
        self
    }

    /// Concatenated text blocks, used for the user side of the log
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| c.as_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All suggestions carried by this message, flattened in display order
    pub fn suggestions(&self) -> impl Iterator<Item = &String> {
        self.content
            .iter()
            .filter_map(|c| c.as_suggestions())
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_user_message() {
        let message = Message::user().with_text("abcd");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.text(), "abcd");
    }

    #[test]
    fn test_assistant_blocks_keep_order() {
        let message = Message::assistant().with_blocks(vec![
            ContentBlock::text("first"),
            ContentBlock::sql("SELECT 1"),
            ContentBlock::text("second"),
        ]);
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content[1].as_sql(), Some("SELECT 1"));
        assert_eq!(message.text(), "first\nsecond");
    }

    #[test]
    fn test_suggestions_flatten_across_blocks() {
        let message = Message::assistant()
            .with_content(ContentBlock::suggestions(["a", "b"]))
            .with_text("between")
            .with_content(ContentBlock::suggestions(["c"]));

        let all: Vec<&String> = message.suggestions().collect();
        assert_eq!(all, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_serialization() {
        let message = Message::user().with_text("Hello, world!");
        let serialized = serde_json::to_string(&message).unwrap();
        let deserialized: Message = serde_json::from_str(&serialized).unwrap();
        assert_eq!(message, deserialized);

        let json_value: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(json_value["role"], "user");
        assert!(json_value.get("created").is_some());
        assert_eq!(json_value["content"][0]["type"], "text");
    }
}
