//! SALVO headless host.
//!
//! Wires the simulation crates into a frame loop that feeds the registry
//! irregular deltas the way a rendering host would, plus the demo scenario
//! the `salvo` binary runs.

pub mod host;
pub mod scenario;

pub use salvo_core as core;
