//! Pure in-memory board operations.
//!
//! # Responsibility
//! - Compute board changes for drag results and card lifecycle requests.
//! - Stay free of I/O so every rule can be tested synchronously.
//!
//! # Invariants
//! - All validation happens before the first mutation; an `Err` means the
//!   board was not touched.

pub mod lifecycle;
pub mod reorder;
