//! Board domain model: cards, the fixed column set, and the board itself.
//!
//! # Responsibility
//! - Define canonical data structures shared by engine, persistence and UI.
//! - Own the board-wide invariants checked at construction time.
//!
//! # Invariants
//! - Every card is identified by a stable `CardId`, unique across the board.
//! - The column set is fixed: `todo`, `progress`, `done`, in that order.

pub mod board;
pub mod card;
pub mod column;
