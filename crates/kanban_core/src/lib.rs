//! Core logic for the three-column Kanban board.
//! This crate owns board invariants, reordering rules and persistence.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod service;
pub mod store;

pub use config::CoreConfig;
pub use engine::lifecycle::{add_card, delete_card, edit_card};
pub use engine::reorder::{move_card, move_card_by_name, CardPosition, DragResult, MoveOutcome};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{Board, BoardError, InvalidMoveReason};
pub use model::card::{Card, CardId};
pub use model::column::{Column, ColumnId, UnknownColumn};
pub use persistence::{BoardPersistence, CardMutation, PersistError, PersistReport};
pub use service::board_service::{BoardService, Persisted};
pub use store::{
    CardStore, ColumnDocument, ColumnTransaction, InMemoryCardStore, SqliteCardStore, StoreError,
    StoreResult, TransactionOutcome,
};
