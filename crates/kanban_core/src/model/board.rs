//! Board aggregate and its error taxonomy.
//!
//! # Responsibility
//! - Hold the three columns in display order.
//! - Validate id uniqueness whenever a board is assembled from outside data.
//!
//! # Invariants
//! - Exactly one `Column` per `ColumnId`, ordered as `ColumnId::ALL`.
//! - Card ids are unique across the whole board.
//! - Failed operations never leave a partially mutated board.

use crate::model::card::{Card, CardId};
use crate::model::column::{Column, ColumnId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a move request was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidMoveReason {
    /// Column name does not match any fixed column.
    UnknownColumn(String),
    /// Source index is not a card position in the source column.
    SourceOutOfBounds {
        column: ColumnId,
        index: usize,
        len: usize,
    },
    /// Destination index is past the last legal insertion slot.
    DestinationOutOfBounds {
        column: ColumnId,
        index: usize,
        max: usize,
    },
}

impl Display for InvalidMoveReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownColumn(name) => write!(f, "unknown column `{name}`"),
            Self::SourceOutOfBounds { column, index, len } => write!(
                f,
                "source index {index} out of bounds for column `{column}` with {len} card(s)"
            ),
            Self::DestinationOutOfBounds { column, index, max } => write!(
                f,
                "destination index {index} out of bounds for column `{column}` (max {max})"
            ),
        }
    }
}

/// Errors from local, synchronous board operations.
///
/// Every variant guarantees the board is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Bad column id or index for a move.
    InvalidMove(InvalidMoveReason),
    /// Card text is blank after trim.
    EmptyText,
    /// No column holds the requested card.
    CardNotFound(CardId),
    /// Assembled board would hold the same card id twice.
    DuplicateCardId(CardId),
    /// Assembled board lists the same column twice.
    DuplicateColumn(ColumnId),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMove(reason) => write!(f, "invalid move: {reason}"),
            Self::EmptyText => write!(f, "card text must not be blank"),
            Self::CardNotFound(id) => write!(f, "card not found: {id}"),
            Self::DuplicateCardId(id) => write!(f, "duplicate card id on board: {id}"),
            Self::DuplicateColumn(id) => write!(f, "duplicate column on board: {id}"),
        }
    }
}

impl Error for BoardError {}

impl From<InvalidMoveReason> for BoardError {
    fn from(value: InvalidMoveReason) -> Self {
        Self::InvalidMove(value)
    }
}

/// In-memory board state for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardSnapshot")]
pub struct Board {
    columns: Vec<Column>,
}

#[derive(Deserialize)]
struct BoardSnapshot {
    columns: Vec<Column>,
}

impl TryFrom<BoardSnapshot> for Board {
    type Error = BoardError;

    fn try_from(value: BoardSnapshot) -> Result<Self, Self::Error> {
        Board::from_columns(value.columns)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board with three empty columns.
    pub fn new() -> Self {
        Self {
            columns: ColumnId::ALL.into_iter().map(Column::empty).collect(),
        }
    }

    /// Assembles a board from externally supplied columns.
    ///
    /// Columns may arrive in any order and absent columns start empty.
    ///
    /// # Errors
    /// - `DuplicateColumn` when one column id is supplied twice.
    /// - `DuplicateCardId` when one card id appears more than once anywhere.
    pub fn from_columns(columns: impl IntoIterator<Item = Column>) -> Result<Self, BoardError> {
        let mut board = Self::new();
        let mut seen_columns = HashSet::new();
        let mut seen_cards = HashSet::new();

        for column in columns {
            if !seen_columns.insert(column.id) {
                return Err(BoardError::DuplicateColumn(column.id));
            }
            for card in &column.cards {
                if !seen_cards.insert(card.id.clone()) {
                    return Err(BoardError::DuplicateCardId(card.id.clone()));
                }
            }
            let id = column.id;
            board.columns[id.position()] = Column::with_cards(id, column.cards);
        }

        Ok(board)
    }

    /// Convenience constructor used by callers holding plain card lists.
    pub fn from_cards(
        columns: impl IntoIterator<Item = (ColumnId, Vec<Card>)>,
    ) -> Result<Self, BoardError> {
        Self::from_columns(
            columns
                .into_iter()
                .map(|(id, cards)| Column::with_cards(id, cards)),
        )
    }

    /// Columns in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[id.position()]
    }

    pub(crate) fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        &mut self.columns[id.position()]
    }

    /// Total number of cards across all columns.
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub fn contains_card(&self, card_id: &CardId) -> bool {
        self.locate(card_id).is_some()
    }

    /// Finds the column and index holding `card_id`.
    ///
    /// Columns are scanned in `ColumnId::LOOKUP_PRIORITY` order.
    pub fn locate(&self, card_id: &CardId) -> Option<(ColumnId, usize)> {
        ColumnId::LOOKUP_PRIORITY.into_iter().find_map(|column| {
            self.column(column)
                .index_of(card_id)
                .map(|index| (column, index))
        })
    }

    pub fn card(&self, card_id: &CardId) -> Option<&Card> {
        self.locate(card_id)
            .map(|(column, index)| &self.column(column).cards[index])
    }
}
