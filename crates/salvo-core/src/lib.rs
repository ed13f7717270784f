//! Core types and definitions for the SALVO simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! identifiers, capability traits, events, snapshots, constants and errors.
//! It contains no scheduling logic.

pub mod capabilities;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::SimError;

#[cfg(test)]
mod tests;
