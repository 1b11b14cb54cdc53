//! Session-level use-case services.
//!
//! # Responsibility
//! - Combine pure board operations with best-effort persistence.
//! - Keep presentation callers decoupled from store details.

pub mod board_service;
