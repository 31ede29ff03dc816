//! Network types and the HTTP transport seam.

pub mod api;
pub mod types;
