//! Sensor state machines: one refresh orchestrator per upstream integration.
//!
//! Each sensor holds its config, an API client, and the latest snapshot. The
//! host drives the tick by calling `refresh(now)`; nothing here owns a timer.

pub mod gate;

mod air_quality;
mod pollen;

pub use air_quality::*;
pub use pollen::*;
