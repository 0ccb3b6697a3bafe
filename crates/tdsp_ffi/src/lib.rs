//! Flutter-facing bindings for the TDSP core.

pub mod api;
