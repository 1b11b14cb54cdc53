//! Process-local card store.
//!
//! Useful for sessions that do not need durability and as a test double.
//! Every operation takes the single map lock, which also provides the
//! isolation `run_transaction` requires.

use super::{CardStore, ColumnDocument, ColumnTransaction, StoreResult, TransactionOutcome};
use crate::model::card::Card;
use crate::model::column::ColumnId;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// `CardStore` backed by a `HashMap` behind an async mutex.
#[derive(Debug, Default)]
pub struct InMemoryCardStore {
    documents: Mutex<HashMap<ColumnId, ColumnDocument>>,
}

impl InMemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given column contents.
    pub fn with_documents(columns: impl IntoIterator<Item = (ColumnId, Vec<Card>)>) -> Self {
        let documents = columns
            .into_iter()
            .map(|(column, cards)| {
                (
                    column,
                    ColumnDocument {
                        column,
                        cards,
                        revision: 1,
                    },
                )
            })
            .collect();
        Self {
            documents: Mutex::new(documents),
        }
    }
}

fn write_document(
    documents: &mut HashMap<ColumnId, ColumnDocument>,
    column: ColumnId,
    cards: Vec<Card>,
) -> u64 {
    let document = documents.entry(column).or_insert_with(|| ColumnDocument {
        column,
        cards: Vec::new(),
        revision: 0,
    });
    document.cards = cards;
    document.revision += 1;
    document.revision
}

#[async_trait]
impl CardStore for InMemoryCardStore {
    async fn get(&self, column: ColumnId) -> StoreResult<Option<ColumnDocument>> {
        Ok(self.documents.lock().await.get(&column).cloned())
    }

    async fn set(&self, column: ColumnId, cards: &[Card]) -> StoreResult<()> {
        let mut documents = self.documents.lock().await;
        write_document(&mut documents, column, cards.to_vec());
        Ok(())
    }

    async fn run_transaction(
        &self,
        column: ColumnId,
        apply: ColumnTransaction<'_>,
    ) -> StoreResult<TransactionOutcome> {
        let mut documents = self.documents.lock().await;
        let mut cards = documents
            .get(&column)
            .map(|document| document.cards.clone())
            .unwrap_or_default();
        if !apply(&mut cards) {
            return Ok(TransactionOutcome::Aborted);
        }
        let revision = write_document(&mut documents, column, cards);
        Ok(TransactionOutcome::Committed { revision })
    }
}
