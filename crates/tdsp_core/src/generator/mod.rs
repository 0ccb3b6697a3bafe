//! Registry-derived generators.
//!
//! # Responsibility
//! - Derive the extraction prompt, input form, form collector and detail view
//!   from one `SchemaRegistry`.
//!
//! # Invariants
//! - Generators read the registry only; none of them mutates it.
//! - Unknown categories or enum sets degrade to empty output.

pub mod collector;
pub mod detail;
pub mod form;
pub mod prompt;
