//! Card add/edit/delete operations.
//!
//! # Invariants
//! - Card text is stored trimmed and is never blank.
//! - New ids never collide with an id already on the board.
//! - Lookup by id follows `ColumnId::LOOKUP_PRIORITY`.

use crate::model::board::{Board, BoardError};
use crate::model::card::{Card, CardId};
use crate::model::column::ColumnId;

/// Appends a new card to the end of `column`.
///
/// # Errors
/// - `BoardError::EmptyText` when `text` is blank after trim.
pub fn add_card(
    board: &mut Board,
    column: ColumnId,
    text: impl Into<String>,
) -> Result<Card, BoardError> {
    let text = normalize_text(text.into())?;
    let id = fresh_card_id(board);
    let card = Card::new(id, text);
    board.column_mut(column).cards.push(card.clone());
    Ok(card)
}

/// Replaces the text of one card, leaving id and position unchanged.
///
/// Returns the owning column and the card as stored after the edit.
///
/// # Errors
/// - `BoardError::EmptyText` when `new_text` is blank after trim.
/// - `BoardError::CardNotFound` when no column holds `card_id`.
pub fn edit_card(
    board: &mut Board,
    card_id: &CardId,
    new_text: impl Into<String>,
) -> Result<(ColumnId, Card), BoardError> {
    let new_text = normalize_text(new_text.into())?;
    let (column, index) = board
        .locate(card_id)
        .ok_or_else(|| BoardError::CardNotFound(card_id.clone()))?;
    let card = &mut board.column_mut(column).cards[index];
    card.text = new_text;
    Ok((column, card.clone()))
}

/// Removes one card from its column.
///
/// A repeated call with the same id fails with `CardNotFound`.
pub fn delete_card(board: &mut Board, card_id: &CardId) -> Result<(ColumnId, Card), BoardError> {
    let (column, index) = board
        .locate(card_id)
        .ok_or_else(|| BoardError::CardNotFound(card_id.clone()))?;
    let card = board.column_mut(column).cards.remove(index);
    Ok((column, card))
}

fn fresh_card_id(board: &Board) -> CardId {
    loop {
        let candidate = CardId::generate();
        if !board.contains_card(&candidate) {
            return candidate;
        }
    }
}

fn normalize_text(value: String) -> Result<String, BoardError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardError::EmptyText);
    }
    Ok(trimmed.to_string())
}
