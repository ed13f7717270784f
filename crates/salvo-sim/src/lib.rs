//! Simulation engine for SALVO.
//!
//! Owns the cluster registry, runs fixed-step missile integration decoupled
//! from the host frame rate, and produces `RegistrySnapshot`s for hosts.

pub mod cluster;
pub mod config;
pub mod guidance;
pub mod missile;
pub mod registry;
pub mod snapshot;
pub mod spawn;
pub mod target;

pub use salvo_core as core;
pub use cluster::{ClusterLaunch, ClusterSimulator};
pub use config::{ClusterParameters, SimConfig};
pub use registry::SimulationRegistry;
