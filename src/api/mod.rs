//! Clients for the upstream Google environmental-data APIs.

mod google;

#[cfg(test)]
mod google_test;

pub use google::*;
