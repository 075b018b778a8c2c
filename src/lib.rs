//! Routesmith library
//!
//! Incremental code synthesis for Express HTTP API projects. A stream of
//! generation requests (usually chosen by a language model) is dispatched to
//! file emitters and to the controller synthesizer, which merges new routes
//! into previously generated router files.
#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod generation;
pub mod infrastructure;
