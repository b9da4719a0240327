//! Sleuth server library.
//!
//! This library exposes internal modules for integration testing.
//! In production, `sleuth-server` is used as a binary (main.rs).

pub mod cli;
pub mod logging;
pub mod metrics_server;
pub mod routes;
pub mod server;
pub mod state;
