//! Command-line surface: argument definitions and the host loop that drives
//! sensor refreshes and prints snapshots.

mod commands;

pub use commands::*;
