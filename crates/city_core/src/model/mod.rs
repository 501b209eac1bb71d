//! Domain model for the city aggregate.
//!
//! # Responsibility
//! - Define the single canonical `City` shape used by service and storage.
//! - Define the paging envelope returned by name search.
//! - Provide hand-written transport mapping shapes.
//!
//! # Invariants
//! - `City::id` is assigned by the store and never by callers.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod city;
pub mod dto;
pub mod page;
