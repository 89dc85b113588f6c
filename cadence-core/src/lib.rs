//! Core types and series engine for the cadence ecosystem.
//!
//! This crate provides everything below the HTTP surface:
//! - `Event` and related types for recurring calendar events
//! - `store` module with the `EventStore` abstraction and in-memory backend
//! - the update/delete engines implementing the three recurrence scopes
//! - series aggregation for listing

pub mod delete;
pub mod error;
pub mod event;
pub mod identity;
pub mod listing;
pub mod locks;
pub mod participants;
pub mod series;
pub mod store;
pub mod update;

// Re-export the common types at crate root for convenience
pub use error::{CadenceError, CadenceResult};
pub use event::*;
pub use identity::Identity;
