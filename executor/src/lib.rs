//! Steward executor library — exposes modules for integration testing.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod catalog;
pub mod commands;
pub mod docker;
pub mod execute;
pub mod runner;
pub mod stats;

#[cfg(test)]
pub(crate) mod test_support;
