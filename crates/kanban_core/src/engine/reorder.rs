//! Drag-and-drop reorder engine.
//!
//! # Index convention
//! `destination.index` is the index the card ends up at *after* the move
//! (index-after-removal). For a same-column move the card is removed first
//! and reinserted, so the legal destination range is `0..len`. For a
//! cross-column move the legal range is `0..=destination_len`.
//!
//! # Invariants
//! - Total card count is unchanged by a move.
//! - The moved card keeps its id and text.
//! - All other cards keep their relative order.

use crate::model::board::{Board, BoardError, InvalidMoveReason};
use crate::model::card::CardId;
use crate::model::column::ColumnId;
use log::debug;

/// Zero-based slot inside one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPosition {
    pub column: ColumnId,
    pub index: usize,
}

impl CardPosition {
    pub fn new(column: ColumnId, index: usize) -> Self {
        Self { column, index }
    }
}

/// Drop event as reported by the presentation layer.
///
/// `destination == None` means the drag was cancelled or dropped outside
/// any column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragResult {
    pub source: CardPosition,
    pub destination: Option<CardPosition>,
}

impl DragResult {
    pub fn new(source: CardPosition, destination: Option<CardPosition>) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// Result of applying a drag to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Cancelled drag or drop onto the original slot.
    Unchanged,
    Moved {
        card: CardId,
        from: CardPosition,
        to: CardPosition,
    },
}

impl MoveOutcome {
    /// Columns whose card sequence changed and therefore need persisting.
    pub fn affected_columns(&self) -> Vec<ColumnId> {
        match self {
            Self::Unchanged => Vec::new(),
            Self::Moved { from, to, .. } if from.column == to.column => vec![from.column],
            Self::Moved { from, to, .. } => vec![from.column, to.column],
        }
    }
}

/// Applies `drag` to `board`.
///
/// A cancelled drag is a no-op and is not validated. Otherwise the source
/// position is validated before the same-slot no-op check, so a drop onto an
/// out-of-range slot is reported instead of silently ignored.
///
/// # Errors
/// - `BoardError::InvalidMove` for out-of-range source or destination indices.
pub fn move_card(board: &mut Board, drag: &DragResult) -> Result<MoveOutcome, BoardError> {
    let Some(destination) = drag.destination else {
        return Ok(MoveOutcome::Unchanged);
    };
    let source = drag.source;

    let source_len = board.column(source.column).len();
    if source.index >= source_len {
        return Err(InvalidMoveReason::SourceOutOfBounds {
            column: source.column,
            index: source.index,
            len: source_len,
        }
        .into());
    }

    if source == destination {
        return Ok(MoveOutcome::Unchanged);
    }

    let max_destination = if source.column == destination.column {
        source_len - 1
    } else {
        board.column(destination.column).len()
    };
    if destination.index > max_destination {
        return Err(InvalidMoveReason::DestinationOutOfBounds {
            column: destination.column,
            index: destination.index,
            max: max_destination,
        }
        .into());
    }

    let card = board.column_mut(source.column).cards.remove(source.index);
    let card_id = card.id.clone();
    board
        .column_mut(destination.column)
        .cards
        .insert(destination.index, card);

    debug!(
        "event=card_move module=engine status=ok from={}:{} to={}:{}",
        source.column, source.index, destination.column, destination.index
    );

    Ok(MoveOutcome::Moved {
        card: card_id,
        from: source,
        to: destination,
    })
}

/// String-keyed variant of [`move_card`] for callers holding raw column names.
///
/// Both names are parsed before anything else, so an unknown source column is
/// rejected even for a cancelled drag.
///
/// # Errors
/// - `InvalidMoveReason::UnknownColumn` when either name is not a column.
/// - Everything [`move_card`] reports.
pub fn move_card_by_name(
    board: &mut Board,
    source_column: &str,
    source_index: usize,
    destination: Option<(&str, usize)>,
) -> Result<MoveOutcome, BoardError> {
    let source = CardPosition::new(parse_column(source_column)?, source_index);
    let destination = match destination {
        Some((column, index)) => Some(CardPosition::new(parse_column(column)?, index)),
        None => None,
    };
    move_card(board, &DragResult::new(source, destination))
}

fn parse_column(name: &str) -> Result<ColumnId, BoardError> {
    name.parse::<ColumnId>()
        .map_err(|err| InvalidMoveReason::UnknownColumn(err.0).into())
}

#[cfg(test)]
mod tests {
    use super::{move_card, move_card_by_name, CardPosition, DragResult, MoveOutcome};
    use crate::model::board::{Board, BoardError, InvalidMoveReason};
    use crate::model::card::Card;
    use crate::model::column::ColumnId;

    fn texts(board: &Board, column: ColumnId) -> Vec<&str> {
        board
            .column(column)
            .cards
            .iter()
            .map(|card| card.text.as_str())
            .collect()
    }

    fn abc_board() -> Board {
        let cards = vec![
            Card::new("1", "A"),
            Card::new("2", "B"),
            Card::new("3", "C"),
        ];
        Board::from_cards([(ColumnId::Todo, cards)]).unwrap()
    }

    fn drag(from: (ColumnId, usize), to: Option<(ColumnId, usize)>) -> DragResult {
        DragResult::new(
            CardPosition::new(from.0, from.1),
            to.map(|(column, index)| CardPosition::new(column, index)),
        )
    }

    #[test]
    fn cancelled_drag_is_noop() {
        let mut board = abc_board();
        let before = board.clone();
        let outcome = move_card(&mut board, &drag((ColumnId::Todo, 0), None)).unwrap();
        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert_eq!(board, before);
    }

    #[test]
    fn same_slot_is_noop() {
        let mut board = abc_board();
        let before = board.clone();
        let outcome = move_card(
            &mut board,
            &drag((ColumnId::Todo, 1), Some((ColumnId::Todo, 1))),
        )
        .unwrap();
        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert!(outcome.affected_columns().is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn same_column_first_to_last_uses_index_after_removal() {
        let mut board = abc_board();
        move_card(
            &mut board,
            &drag((ColumnId::Todo, 0), Some((ColumnId::Todo, 2))),
        )
        .unwrap();
        assert_eq!(texts(&board, ColumnId::Todo), vec!["B", "C", "A"]);
    }

    #[test]
    fn same_column_last_to_first() {
        let mut board = abc_board();
        let outcome = move_card(
            &mut board,
            &drag((ColumnId::Todo, 2), Some((ColumnId::Todo, 0))),
        )
        .unwrap();
        assert_eq!(texts(&board, ColumnId::Todo), vec!["C", "A", "B"]);
        assert_eq!(outcome.affected_columns(), vec![ColumnId::Todo]);
    }

    #[test]
    fn same_column_destination_equal_to_len_is_rejected() {
        let mut board = abc_board();
        let before = board.clone();
        let err = move_card(
            &mut board,
            &drag((ColumnId::Todo, 0), Some((ColumnId::Todo, 3))),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BoardError::InvalidMove(InvalidMoveReason::DestinationOutOfBounds {
                column: ColumnId::Todo,
                index: 3,
                max: 2,
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn cross_column_append_at_len_is_allowed() {
        let mut board = Board::from_cards([
            (ColumnId::Todo, vec![Card::new("1", "A")]),
            (ColumnId::Done, vec![Card::new("2", "B")]),
        ])
        .unwrap();
        let outcome = move_card(
            &mut board,
            &drag((ColumnId::Todo, 0), Some((ColumnId::Done, 1))),
        )
        .unwrap();
        assert_eq!(texts(&board, ColumnId::Done), vec!["B", "A"]);
        assert!(board.column(ColumnId::Todo).is_empty());
        assert_eq!(
            outcome.affected_columns(),
            vec![ColumnId::Todo, ColumnId::Done]
        );
    }

    #[test]
    fn cross_column_destination_past_len_is_rejected() {
        let mut board = Board::from_cards([
            (ColumnId::Todo, vec![Card::new("1", "A")]),
            (ColumnId::Done, vec![Card::new("2", "B")]),
        ])
        .unwrap();
        let before = board.clone();
        let err = move_card(
            &mut board,
            &drag((ColumnId::Todo, 0), Some((ColumnId::Done, 2))),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BoardError::InvalidMove(InvalidMoveReason::DestinationOutOfBounds {
                column: ColumnId::Done,
                index: 2,
                max: 1,
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn source_out_of_bounds_leaves_board_untouched() {
        let mut board = abc_board();
        let before = board.clone();
        let err = move_card(
            &mut board,
            &drag((ColumnId::Progress, 0), Some((ColumnId::Todo, 0))),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BoardError::InvalidMove(InvalidMoveReason::SourceOutOfBounds { len: 0, .. })
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn by_name_rejects_unknown_source_even_when_cancelled() {
        let mut board = abc_board();
        let before = board.clone();
        let err = move_card_by_name(&mut board, "backlog", 0, None).unwrap_err();
        assert_eq!(
            err,
            BoardError::InvalidMove(InvalidMoveReason::UnknownColumn("backlog".to_string()))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn by_name_rejects_unknown_column() {
        let mut board = abc_board();
        let before = board.clone();
        let err = move_card_by_name(&mut board, "todo", 0, Some(("backlog", 0))).unwrap_err();
        assert_eq!(
            err,
            BoardError::InvalidMove(InvalidMoveReason::UnknownColumn("backlog".to_string()))
        );
        assert_eq!(board, before);
    }
}
