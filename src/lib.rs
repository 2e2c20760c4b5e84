//! Polling, caching, and normalization engine for the Google Air Quality and
//! Pollen REST APIs.
//!
//! The core is pull-based: a host (here the CLI in [`cli`], or anything else
//! embedding the library) calls `refresh(now)` on a sensor at its own pace.
//! Each tick the sensor decides per stream whether an upstream call is due,
//! runs the due calls concurrently, and folds the normalized results into a
//! snapshot the host reads back on demand. Upstream failures surface only as
//! a per-stream `error` status with the previous data retained; no data is
//! persisted across restarts.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod sensor;
