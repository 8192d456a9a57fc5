//! Identity types

use serde::{Deserialize, Serialize};

/// A user known to the identity service.
///
/// Resolved, never created, by this service. The id is an opaque identity
/// key, conventionally UUID-shaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
