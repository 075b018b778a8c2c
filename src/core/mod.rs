//! Routesmith core
//!
//! Configuration and the startup-level error type.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::Error;
