//! Postgres dialog store

use dialog_common::RepositoryError;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ensure_storable, DialogStore};
use crate::domain::entities::Message;

/// Row type for dialog lookups
#[derive(sqlx::FromRow)]
struct DialogRow {
    id: Uuid,
    sender_id: String,
    receiver_id: String,
    text: String,
}

impl From<DialogRow> for Message {
    fn from(row: DialogRow) -> Self {
        Message::new(row.sender_id, row.receiver_id, row.text).with_id(row.id.to_string())
    }
}

#[derive(Clone)]
pub struct PgDialogStore {
    pool: PgPool,
}

impl PgDialogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait::async_trait]
impl DialogStore for PgDialogStore {
    async fn add(&self, message: &Message) -> Result<String, RepositoryError> {
        ensure_storable(message)?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO dialogs (sender_id, receiver_id, text)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&message.from)
        .bind(&message.to)
        .bind(&message.text)
        .fetch_one(&self.pool)
        .await?;

        Ok(id.to_string())
    }

    async fn list_between(&self, a: &str, b: &str) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, DialogRow>(
            r#"
            SELECT id, sender_id, receiver_id, text
            FROM dialogs
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY seq ASC
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Message::from).collect())
    }
}
