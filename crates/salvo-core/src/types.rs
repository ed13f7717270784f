//! Fundamental identifiers and simulation time types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Deterministic random source shared with collaborators.
///
/// Seeded once when the registry is created and never reset.
pub type SimRng = rand_chacha::ChaCha8Rng;

/// Stable identity of a registered target. Allocated by the registry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TargetId(pub u32);

/// Stable identity of a launched cluster. Never reused within a registry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ClusterId(pub u32);

/// Addresses one missile: its owning cluster plus its slot in the cluster's array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissileHandle {
    pub cluster: ClusterId,
    pub index: usize,
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

impl fmt::Display for MissileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.cluster, self.index)
    }
}

impl MissileHandle {
    pub fn new(cluster: ClusterId, index: usize) -> Self {
        Self { cluster, index }
    }
}

/// Registry-level time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of `update_simulation` calls processed.
    pub frame: u64,
    /// Scaled seconds fed to the simulation so far.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Record one host frame of `scaled_secs` simulated seconds.
    pub fn advance(&mut self, scaled_secs: f64) {
        self.frame += 1;
        self.elapsed_secs += scaled_secs;
    }
}
