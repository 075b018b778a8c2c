//! Project store implementations

pub mod filesystem_output;
pub mod memory_output;

pub use filesystem_output::*;
pub use memory_output::*;
