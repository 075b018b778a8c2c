//! Generation domain
//!
//! Everything that decides what a generated Express project looks like:
//! route naming, the file emitters, and the controller merge. All functions
//! here are pure over their inputs; file I/O belongs to the application and
//! infrastructure layers.

pub mod controller;
pub mod emitters;
pub mod errors;
pub mod inflection;
pub mod naming;
pub mod rules;
pub mod sanitizers;
pub mod traits;
pub mod types;

pub use errors::*;
pub use traits::*;
pub use types::*;
