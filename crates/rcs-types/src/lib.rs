//! Foundation types for the REST client SDK.
//!
//! This crate provides the identifier and model types shared by every other
//! `rcs-*` crate.
//!
//! # Key Types
//!
//! - [`EntityId`]: Canonical identifier used to key clean snapshots
//! - [`Model`]: Normalized, wire-shaped representation of an entity

pub mod error;
pub mod id;
pub mod model;

pub use error::TypeError;
pub use id::EntityId;
pub use model::{into_model, Model};
