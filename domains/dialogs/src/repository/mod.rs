//! Dialog store contract and implementations

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use dialog_common::config::Config;
use dialog_common::RepositoryError;

use crate::domain::entities::Message;

pub use memory::InMemoryDialogStore;
pub use postgres::PgDialogStore;

/// Persistence contract for dialog messages.
///
/// Messages are ordered by the store's own acceptance order. Implementations
/// must be safe to call concurrently.
#[async_trait::async_trait]
pub trait DialogStore: Send + Sync {
    /// Append a message and return the id assigned to it
    async fn add(&self, message: &Message) -> Result<String, RepositoryError>;

    /// All messages exchanged between `a` and `b` in either direction,
    /// oldest first. An empty conversation is an empty list.
    async fn list_between(&self, a: &str, b: &str) -> Result<Vec<Message>, RepositoryError>;
}

/// Dialog store factory
pub struct DialogStoreFactory;

impl DialogStoreFactory {
    /// Create a dialog store based on configuration.
    ///
    /// The Postgres store connects and applies pending migrations before it
    /// is handed out.
    pub async fn create(config: &Config) -> Result<Arc<dyn DialogStore>, RepositoryError> {
        match config.dialog_store.as_str() {
            "postgres" => {
                tracing::info!("Creating Postgres dialog store");
                let pool =
                    dialog_common::db::connect(&config.database_url, config.db_max_connections)
                        .await?;
                let store = PgDialogStore::new(pool);
                store.migrate().await?;
                Ok(Arc::new(store))
            }
            "memory" => {
                tracing::info!("Creating in-memory dialog store");
                Ok(Arc::new(InMemoryDialogStore::new()))
            }
            other => Err(RepositoryError::InvalidData(format!(
                "Unknown dialog store: {}",
                other
            ))),
        }
    }
}

/// Reject messages the store must never accept
pub(crate) fn ensure_storable(message: &Message) -> Result<(), RepositoryError> {
    if message.text.is_empty() {
        return Err(RepositoryError::InvalidData(
            "message text must not be empty".to_string(),
        ));
    }
    Ok(())
}
