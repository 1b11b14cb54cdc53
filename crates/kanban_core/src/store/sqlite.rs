//! SQLite-backed column document store.
//!
//! # Responsibility
//! - Persist one `column_documents` row per column with its cards as JSON.
//! - Serialize single-document transactions with `BEGIN IMMEDIATE`.
//!
//! # Invariants
//! - The wrapped connection is migrated before any document access.
//! - `cards_json` always decodes to an ordered `[{id, text}]` list.

use super::{
    CardStore, ColumnDocument, ColumnTransaction, StoreError, StoreResult, TransactionOutcome,
};
use crate::db::migrations::{current_user_version, latest_version};
use crate::model::card::Card;
use crate::model::column::ColumnId;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::sync::Arc;
use tokio::sync::Mutex;

/// `CardStore` over a shared, migrated SQLite connection.
#[derive(Clone)]
pub struct SqliteCardStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCardStore {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `StoreError::UninitializedConnection` when migrations were not applied.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }
}

#[async_trait]
impl CardStore for SqliteCardStore {
    async fn get(&self, column: ColumnId) -> StoreResult<Option<ColumnDocument>> {
        let conn = self.conn.lock().await;
        load_document(&conn, column)
    }

    async fn set(&self, column: ColumnId, cards: &[Card]) -> StoreResult<()> {
        let payload = serde_json::to_string(cards)?;
        let conn = self.conn.lock().await;
        upsert_document(&conn, column, &payload)?;
        Ok(())
    }

    async fn run_transaction(
        &self,
        column: ColumnId,
        apply: ColumnTransaction<'_>,
    ) -> StoreResult<TransactionOutcome> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut cards = load_document(&tx, column)?
            .map(|document| document.cards)
            .unwrap_or_default();
        if !apply(&mut cards) {
            tx.rollback()?;
            return Ok(TransactionOutcome::Aborted);
        }

        let payload = serde_json::to_string(&cards)?;
        let revision = upsert_document(&tx, column, &payload)?;
        tx.commit()?;
        Ok(TransactionOutcome::Committed { revision })
    }
}

fn load_document(conn: &Connection, column: ColumnId) -> StoreResult<Option<ColumnDocument>> {
    let row: Option<(String, i64)> = conn
        .query_row(
            "SELECT cards_json, revision
             FROM column_documents
             WHERE column_id = ?1;",
            [column.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((cards_json, revision)) = row else {
        return Ok(None);
    };
    let revision = u64::try_from(revision).map_err(|_| {
        StoreError::InvalidData(format!(
            "negative revision `{revision}` in column_documents.revision for `{column}`"
        ))
    })?;
    let cards: Vec<Card> = serde_json::from_str(&cards_json)?;
    Ok(Some(ColumnDocument {
        column,
        cards,
        revision,
    }))
}

fn upsert_document(conn: &Connection, column: ColumnId, cards_json: &str) -> StoreResult<u64> {
    let revision: i64 = conn.query_row(
        "INSERT INTO column_documents (column_id, cards_json, revision, updated_at)
         VALUES (?1, ?2, 1, (strftime('%s', 'now') * 1000))
         ON CONFLICT(column_id) DO UPDATE SET
            cards_json = excluded.cards_json,
            revision = column_documents.revision + 1,
            updated_at = excluded.updated_at
         RETURNING revision;",
        params![column.as_str(), cards_json],
        |row| row.get(0),
    )?;
    u64::try_from(revision).map_err(|_| {
        StoreError::InvalidData(format!("negative revision `{revision}` after write"))
    })
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::SqliteCardStore;
    use crate::db::open_db_in_memory;
    use crate::model::card::Card;
    use crate::model::column::ColumnId;
    use crate::store::{CardStore, StoreError, TransactionOutcome};
    use rusqlite::Connection;

    fn store() -> SqliteCardStore {
        SqliteCardStore::try_new(open_db_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteCardStore::try_new(conn).err().unwrap();
        assert!(matches!(
            err,
            StoreError::UninitializedConnection {
                actual_version: 0,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn set_then_get_preserves_order() {
        let store = store();
        let cards = vec![Card::new("b", "second"), Card::new("a", "first")];
        store.set(ColumnId::Progress, &cards).await.unwrap();

        let document = store.get(ColumnId::Progress).await.unwrap().unwrap();
        assert_eq!(document.cards, cards);
        assert_eq!(document.revision, 1);
        assert!(store.get(ColumnId::Todo).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn transaction_commit_bumps_revision() {
        let store = store();
        store
            .set(ColumnId::Todo, &[Card::new("1", "A")])
            .await
            .unwrap();

        let outcome = store
            .run_transaction(ColumnId::Todo, &mut |cards: &mut Vec<Card>| {
                cards[0].text = "A2".to_string();
                true
            })
            .await
            .unwrap();
        assert_eq!(outcome, TransactionOutcome::Committed { revision: 2 });

        let document = store.get(ColumnId::Todo).await.unwrap().unwrap();
        assert_eq!(document.cards, vec![Card::new("1", "A2")]);
    }

    #[tokio::test]
    async fn corrupt_payload_is_reported() {
        let store = store();
        {
            let conn = store.connection();
            let conn = conn.lock().await;
            conn.execute(
                "INSERT INTO column_documents (column_id, cards_json, revision)
                 VALUES ('done', 'not json', 1);",
                [],
            )
            .unwrap();
        }
        let err = store.get(ColumnId::Done).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
