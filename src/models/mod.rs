//! Data structures for the application.
//!
//! Includes:
//! - `google`: Deserialization structs for the Google Air Quality and Pollen API responses.
//! - `snapshot`: The normalized per-sensor state exposed to the host.

mod google;
mod snapshot;

pub use google::*;
pub use snapshot::*;
