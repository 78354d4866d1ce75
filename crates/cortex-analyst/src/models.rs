//! These models represent the objects exchanged with the analyst service
//!
//! The service speaks a small JSON protocol: a user message carries a single text block,
//! and the reply carries an ordered list of typed content blocks (text, suggestions, sql).
//! We deserialize those blocks straight into a closed enum so the renderer can match on
//! them exhaustively.
pub mod content;
pub mod message;
pub mod role;
