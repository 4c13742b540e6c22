//! UK Carbon Intensity Dashboard library
//!
//! Exposes the data, cache, and UI modules used by the `carbondash` binary and
//! its integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod ui;
