//! Infrastructure layer - concrete implementations of application ports

pub mod generation;
pub mod output;
pub mod shell;

pub use generation::*;
pub use output::*;
pub use shell::*;
