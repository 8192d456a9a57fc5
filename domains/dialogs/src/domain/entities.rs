//! Domain entities for the Dialogs domain

use serde::{Deserialize, Serialize};

/// A direct message from one identity to another.
///
/// The id is assigned by the store and stays empty until the message is
/// persisted. Messages are never edited once accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub from: String,
    pub to: String,
    pub text: String,
}

impl Message {
    /// Create a message that has not been stored yet
    pub fn new(from: impl Into<String>, to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            from: from.into(),
            to: to.into(),
            text: text.into(),
        }
    }

    /// Copy of this message carrying the id assigned by the store
    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self
        }
    }

    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    /// Whether the message belongs to the conversation of `a` and `b`,
    /// in either direction
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}
