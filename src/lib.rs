//! All-seasons farming library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) runs a headless demo of a season change.
//! Everything it uses lives here so that `tests/` integration tests can
//! drive the same plugins without a window or GPU.

pub mod shared;
pub mod error;
pub mod config;
pub mod content;
pub mod data;
pub mod calendar;
pub mod farming;
pub mod world;
pub mod save;
pub mod seasons;
