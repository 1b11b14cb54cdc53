//! Persistence adapter between the in-memory board and a `CardStore`.
//!
//! # Responsibility
//! - Hydrate a `Board` from stored column documents.
//! - Write back whole columns after moves and adds.
//! - Apply edit/delete to the owning column with a store transaction.
//!
//! # Invariants
//! - Column writes are independent: one failure never suppresses another.
//! - Failures are reported to the caller and never retried here.
//! - Nothing in this module touches the caller's in-memory `Board`.
//! - Owner lookup reads happen outside the transaction and may be stale.

use crate::model::board::Board;
use crate::model::card::{Card, CardId};
use crate::model::column::ColumnId;
use crate::store::{CardStore, StoreError, TransactionOutcome};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Store-side change applied to one card by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardMutation {
    /// Replace the card text.
    Edit(String),
    /// Remove the card from its column.
    Delete,
}

impl CardMutation {
    fn action(&self) -> &'static str {
        match self {
            Self::Edit(_) => "edit",
            Self::Delete => "delete",
        }
    }
}

/// Errors from store reads/writes issued by the adapter.
#[derive(Debug)]
pub enum PersistError {
    /// Backend failure while reading or writing `column`.
    Store {
        column: ColumnId,
        source: StoreError,
    },
    /// No stored column holds the card.
    CardNotFound(CardId),
    /// Stored columns cannot form a valid board.
    InvalidData(String),
}

impl PersistError {
    /// Stored column the failure happened on, if any.
    pub fn column(&self) -> Option<ColumnId> {
        match self {
            Self::Store { column, .. } => Some(*column),
            Self::CardNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store { column, source } => {
                write!(f, "store failure on column `{column}`: {source}")
            }
            Self::CardNotFound(id) => write!(f, "card not found in store: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored board: {message}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store { source, .. } => Some(source),
            Self::CardNotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

/// Per-column outcome of a multi-column write-back.
#[derive(Debug, Default)]
pub struct PersistReport {
    pub results: Vec<(ColumnId, Result<(), PersistError>)>,
}

impl PersistReport {
    pub fn is_ok(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_ok())
    }

    /// Columns whose write failed, with the failure.
    pub fn failures(&self) -> impl Iterator<Item = (ColumnId, &PersistError)> {
        self.results
            .iter()
            .filter_map(|(column, result)| result.as_ref().err().map(|err| (*column, err)))
    }
}

/// Adapter that owns the injected store.
pub struct BoardPersistence<S: CardStore> {
    store: S,
}

impl<S: CardStore> BoardPersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Builds a board from every stored column.
    ///
    /// A column that was never written hydrates as empty.
    ///
    /// # Errors
    /// - `PersistError::Store` when any column read fails.
    /// - `PersistError::InvalidData` when stored columns share a card id.
    pub async fn hydrate(&self) -> Result<Board, PersistError> {
        let started_at = Instant::now();
        let mut columns = Vec::with_capacity(ColumnId::ALL.len());
        for column in ColumnId::ALL {
            let cards = match self.store.get(column).await {
                Ok(document) => document.map(|document| document.cards).unwrap_or_default(),
                Err(source) => {
                    warn!(
                        "event=board_hydrate module=persistence status=error column={column} error={source}"
                    );
                    return Err(PersistError::Store { column, source });
                }
            };
            columns.push((column, cards));
        }

        let board =
            Board::from_cards(columns).map_err(|err| PersistError::InvalidData(err.to_string()))?;
        info!(
            "event=board_hydrate module=persistence status=ok cards={} duration_ms={}",
            board.card_count(),
            started_at.elapsed().as_millis()
        );
        Ok(board)
    }

    /// Replaces the stored sequence of one column. Reads no other column.
    pub async fn persist_column(
        &self,
        column: ColumnId,
        cards: &[Card],
    ) -> Result<(), PersistError> {
        match self.store.set(column, cards).await {
            Ok(()) => {
                info!(
                    "event=column_persist module=persistence status=ok column={column} cards={}",
                    cards.len()
                );
                Ok(())
            }
            Err(source) => {
                warn!(
                    "event=column_persist module=persistence status=error column={column} error={source}"
                );
                Err(PersistError::Store { column, source })
            }
        }
    }

    /// Writes each listed column of `board` independently.
    pub async fn persist_columns(&self, board: &Board, columns: &[ColumnId]) -> PersistReport {
        let mut report = PersistReport::default();
        for &column in columns {
            let result = self
                .persist_column(column, &board.column(column).cards)
                .await;
            report.results.push((column, result));
        }
        report
    }

    /// Applies `mutation` to the stored column that owns `card_id`.
    ///
    /// Columns are searched in `ColumnId::LOOKUP_PRIORITY` order with plain
    /// reads. The owning column is then rewritten inside a store
    /// transaction. If the card left that column in between, the transaction
    /// aborts and the search continues with the next column.
    ///
    /// Returns the column that was rewritten.
    ///
    /// # Errors
    /// - `PersistError::Store` when the transaction fails, or when no owner
    ///   was found and at least one lookup read failed.
    /// - `PersistError::CardNotFound` when every lookup succeeded and none
    ///   holds the card.
    pub async fn persist_card_mutation(
        &self,
        card_id: &CardId,
        mutation: &CardMutation,
    ) -> Result<ColumnId, PersistError> {
        let action = mutation.action();
        let mut lookup_failure = None;

        for column in ColumnId::LOOKUP_PRIORITY {
            let holds_card = match self.store.get(column).await {
                Ok(document) => document
                    .map(|document| document.cards.iter().any(|card| &card.id == card_id))
                    .unwrap_or(false),
                Err(source) => {
                    warn!(
                        "event=card_mutation_persist module=persistence status=lookup_error action={action} column={column} error={source}"
                    );
                    if lookup_failure.is_none() {
                        lookup_failure = Some(PersistError::Store { column, source });
                    }
                    continue;
                }
            };
            if !holds_card {
                continue;
            }

            let mut apply = |cards: &mut Vec<Card>| apply_mutation(cards, card_id, mutation);
            match self.store.run_transaction(column, &mut apply).await {
                Ok(TransactionOutcome::Committed { revision }) => {
                    info!(
                        "event=card_mutation_persist module=persistence status=ok action={action} column={column} revision={revision}"
                    );
                    return Ok(column);
                }
                Ok(TransactionOutcome::Aborted) => {
                    info!(
                        "event=card_mutation_persist module=persistence status=stale action={action} column={column}"
                    );
                }
                Err(source) => {
                    warn!(
                        "event=card_mutation_persist module=persistence status=error action={action} column={column} error={source}"
                    );
                    return Err(PersistError::Store { column, source });
                }
            }
        }

        if let Some(err) = lookup_failure {
            return Err(err);
        }
        warn!(
            "event=card_mutation_persist module=persistence status=error action={action} error_code=card_not_found"
        );
        Err(PersistError::CardNotFound(card_id.clone()))
    }
}

fn apply_mutation(cards: &mut Vec<Card>, card_id: &CardId, mutation: &CardMutation) -> bool {
    let Some(index) = cards.iter().position(|card| &card.id == card_id) else {
        return false;
    };
    match mutation {
        CardMutation::Edit(text) => cards[index].text = text.clone(),
        CardMutation::Delete => {
            cards.remove(index);
        }
    }
    true
}
