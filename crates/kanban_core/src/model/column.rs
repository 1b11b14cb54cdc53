//! Fixed column set.
//!
//! # Invariants
//! - Columns are never created or destroyed at runtime.
//! - `ColumnId::ALL` order is the board display order.
//! - `ColumnId::LOOKUP_PRIORITY` is the order used to locate a card by id.

use crate::model::card::{Card, CardId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Identifier of one of the three fixed columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnId {
    Todo,
    Progress,
    Done,
}

impl ColumnId {
    /// Display order of columns on the board.
    pub const ALL: [ColumnId; 3] = [ColumnId::Todo, ColumnId::Progress, ColumnId::Done];

    /// Order in which columns are scanned when looking a card up by id.
    ///
    /// The first column containing the id wins. Board invariants make more
    /// than one match impossible in memory; the store may disagree while a
    /// cross-column move is half-written, and then this order decides.
    pub const LOOKUP_PRIORITY: [ColumnId; 3] = [ColumnId::Todo, ColumnId::Progress, ColumnId::Done];

    /// Stable storage/document key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Progress => "progress",
            Self::Done => "done",
        }
    }

    /// User-facing column title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::Progress => "Progress",
            Self::Done => "Done",
        }
    }

    pub(crate) fn position(self) -> usize {
        match self {
            Self::Todo => 0,
            Self::Progress => 1,
            Self::Done => 2,
        }
    }
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumn(pub String);

impl Display for UnknownColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown column `{}`", self.0)
    }
}

impl Error for UnknownColumn {}

impl FromStr for ColumnId {
    type Err = UnknownColumn;

    /// Accepts storage keys (`todo`) and titles (`Todo`), case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "progress" => Ok(Self::Progress),
            "done" => Ok(Self::Done),
            _ => Err(UnknownColumn(value.to_string())),
        }
    }
}

/// One column and its ordered cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub cards: Vec<Card>,
}

impl Column {
    pub fn empty(id: ColumnId) -> Self {
        Self::with_cards(id, Vec::new())
    }

    pub fn with_cards(id: ColumnId, cards: Vec<Card>) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            cards,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub(crate) fn index_of(&self, card_id: &CardId) -> Option<usize> {
        self.cards.iter().position(|card| &card.id == card_id)
    }
}
