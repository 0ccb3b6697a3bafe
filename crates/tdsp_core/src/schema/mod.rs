//! Schema registry.
//!
//! The registry is the single declaration every generator derives from, so
//! the prompt, form, collector and detail view cannot drift apart.

pub mod builtin;
pub mod registry;
