//! Schema and record domain model.
//!
//! # Responsibility
//! - Define field descriptors, category catalogs and records shared by all
//!   generators.
//!
//! # Invariants
//! - Model types carry no rendering logic; generators own presentation.

pub mod category;
pub mod field;
pub mod record;
