//! Steward agent library — exposes modules for integration testing.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clients;
pub mod config;
pub mod direct;
pub mod executor;
pub mod http;
pub mod operations;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;
