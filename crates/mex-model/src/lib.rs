//! Marathon domain types as returned by the `/v2` REST API.
//!
//! Only the fields the exporter turns into metrics are modeled; anything else in the payload is ignored.
mod domain;
pub use domain::*;
