//! Trellis Core
//!
//! Shared utilities for the Trellis widget composition crates: hashed
//! collections, logging bootstrap, profiling and configuration.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod profiling;

pub use config::{Config, ProfilingMode};
