//! In-memory stores for Sediment
//!
//! This crate implements the core store traits with process-local state:
//! - MemoryHistoryStore: append-only history collections behind an RwLock
//! - MemoryRecordStore: a minimal audited record store used by integration
//!   tests and as the wiring reference for real store adapters
//!
//! Both are thread-safe through `parking_lot::RwLock` and safe to share
//! behind `Arc`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;
pub mod records;

pub use memory::MemoryHistoryStore;
pub use records::MemoryRecordStore;
