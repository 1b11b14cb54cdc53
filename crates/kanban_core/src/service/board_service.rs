//! Board session service.
//!
//! # Responsibility
//! - Own the in-memory `Board` for one user session.
//! - Apply each user action through the engine, then write back exactly the
//!   columns it changed.
//!
//! # Invariants
//! - A rejected action (`Err`) changed nothing, in memory or in the store.
//! - An accepted action is never reverted, whatever the store reports.
//! - Only one caller mutates the board; methods take `&mut self`.

use crate::engine::lifecycle;
use crate::engine::reorder::{self, DragResult, MoveOutcome};
use crate::model::board::{Board, BoardError};
use crate::model::card::{Card, CardId};
use crate::model::column::ColumnId;
use crate::persistence::{BoardPersistence, CardMutation, PersistError, PersistReport};
use crate::store::CardStore;
use log::{info, warn};

/// Accepted in-memory change plus what the store made of it.
#[derive(Debug)]
pub struct Persisted<T> {
    pub value: T,
    pub report: PersistReport,
}

impl<T> Persisted<T> {
    /// `true` when every write-back succeeded.
    pub fn is_synced(&self) -> bool {
        self.report.is_ok()
    }
}

/// Board facade used by the presentation layer.
pub struct BoardService<S: CardStore> {
    board: Board,
    persistence: BoardPersistence<S>,
}

impl<S: CardStore> BoardService<S> {
    /// Starts a session from the current store contents.
    pub async fn hydrate(store: S) -> Result<Self, PersistError> {
        let persistence = BoardPersistence::new(store);
        let board = persistence.hydrate().await?;
        Ok(Self { board, persistence })
    }

    /// Starts a session from an already known board without reading the store.
    pub fn with_board(store: S, board: Board) -> Self {
        Self {
            board,
            persistence: BoardPersistence::new(store),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Applies a drag result and persists the source and destination columns.
    pub async fn move_card(
        &mut self,
        drag: &DragResult,
    ) -> Result<Persisted<MoveOutcome>, BoardError> {
        let outcome = reorder::move_card(&mut self.board, drag).map_err(|err| {
            warn!("event=card_move module=service status=rejected error={err}");
            err
        })?;

        let affected = outcome.affected_columns();
        let report = self
            .persistence
            .persist_columns(&self.board, &affected)
            .await;
        log_report("card_move", &report);
        Ok(Persisted {
            value: outcome,
            report,
        })
    }

    /// Appends a card and persists its column.
    pub async fn add_card(
        &mut self,
        column: ColumnId,
        text: impl Into<String>,
    ) -> Result<Persisted<Card>, BoardError> {
        let card = lifecycle::add_card(&mut self.board, column, text).map_err(|err| {
            warn!("event=card_add module=service status=rejected column={column} error={err}");
            err
        })?;

        let report = self
            .persistence
            .persist_columns(&self.board, &[column])
            .await;
        log_report("card_add", &report);
        Ok(Persisted {
            value: card,
            report,
        })
    }

    /// Edits card text and persists it through a store transaction.
    ///
    /// Returns the column owning the card in memory.
    pub async fn edit_card(
        &mut self,
        card_id: &CardId,
        new_text: impl Into<String>,
    ) -> Result<Persisted<ColumnId>, BoardError> {
        let edited = lifecycle::edit_card(&mut self.board, card_id, new_text);
        let (column, card) = edited.map_err(|err| {
            warn!("event=card_edit module=service status=rejected card_id={card_id} error={err}");
            err
        })?;

        let report = self
            .persist_mutation(column, card_id, CardMutation::Edit(card.text))
            .await;
        log_report("card_edit", &report);
        Ok(Persisted {
            value: column,
            report,
        })
    }

    /// Deletes a card and persists the removal through a store transaction.
    pub async fn delete_card(&mut self, card_id: &CardId) -> Result<Persisted<Card>, BoardError> {
        let (column, card) = lifecycle::delete_card(&mut self.board, card_id).map_err(|err| {
            warn!("event=card_delete module=service status=rejected card_id={card_id} error={err}");
            err
        })?;

        let report = self
            .persist_mutation(column, card_id, CardMutation::Delete)
            .await;
        log_report("card_delete", &report);
        Ok(Persisted {
            value: card,
            report,
        })
    }

    /// Files the outcome under the stored column that committed or failed.
    /// `memory_column` is used only when no stored column owns the card.
    async fn persist_mutation(
        &self,
        memory_column: ColumnId,
        card_id: &CardId,
        mutation: CardMutation,
    ) -> PersistReport {
        let result = self
            .persistence
            .persist_card_mutation(card_id, &mutation)
            .await;
        let entry = match result {
            Ok(column) => (column, Ok(())),
            Err(err) => (err.column().unwrap_or(memory_column), Err(err)),
        };
        PersistReport {
            results: vec![entry],
        }
    }
}

fn log_report(event: &str, report: &PersistReport) {
    if report.is_ok() {
        info!(
            "event={event} module=service status=ok columns={}",
            report.results.len()
        );
        return;
    }
    for (column, err) in report.failures() {
        warn!("event={event} module=service status=diverged column={column} error={err}");
    }
}
