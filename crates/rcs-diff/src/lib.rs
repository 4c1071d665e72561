//! Unit of work for the REST client SDK.
//!
//! Tracks the last server-confirmed state of every entity the client has seen
//! and computes the minimal set of changed fields to send on update.
//!
//! # Key Types
//!
//! - [`UnitOfWork`] -- Clean-snapshot store plus the dirty-data diff
//! - [`dirty_data`] -- The diff itself, usable without a store
//! - [`DiffError`] -- Configuration errors surfaced while diffing

pub mod dirty;
pub mod error;
pub mod unit_of_work;

#[cfg(test)]
mod fixtures;

pub use dirty::dirty_data;
pub use error::{DiffError, DiffResult};
pub use unit_of_work::UnitOfWork;
