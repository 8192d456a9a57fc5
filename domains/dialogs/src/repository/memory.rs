//! In-memory dialog store
//!
//! Append-only log guarded by a mutex; used for local development and tests.
//! A message's position in the log is its acceptance order.

use std::sync::{Arc, Mutex};

use dialog_common::RepositoryError;
use uuid::Uuid;

use super::{ensure_storable, DialogStore};
use crate::domain::entities::Message;

/// Dialog store keeping every message in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDialogStore {
    log: Arc<Mutex<Vec<Message>>>,
}

impl InMemoryDialogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored messages
    pub fn len(&self) -> usize {
        self.log.lock().map(|log| log.len()).unwrap_or(0)
    }

    #[mutants::skip] // Delegates to len()
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Message>>, RepositoryError> {
        self.log
            .lock()
            .map_err(|e| RepositoryError::Unavailable(format!("dialog log lock poisoned: {e}")))
    }
}

#[async_trait::async_trait]
impl DialogStore for InMemoryDialogStore {
    async fn add(&self, message: &Message) -> Result<String, RepositoryError> {
        ensure_storable(message)?;

        let id = Uuid::new_v4().to_string();
        let mut log = self.lock()?;
        log.push(message.clone().with_id(id.clone()));

        tracing::debug!(message_id = %id, position = log.len() - 1, "Dialog message stored in memory");
        Ok(id)
    }

    async fn list_between(&self, a: &str, b: &str) -> Result<Vec<Message>, RepositoryError> {
        let log = self.lock()?;
        Ok(log
            .iter()
            .filter(|message| message.is_between(a, b))
            .cloned()
            .collect())
    }
}
