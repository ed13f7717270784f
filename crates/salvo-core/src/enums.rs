//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Flight phase of a missile.
///
/// The engine only distinguishes `Terminated` from everything else; the
/// remaining phases belong to the missile collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissilePhase {
    /// Accelerating away from the launcher.
    #[default]
    Boost,
    /// Guided flight toward the target.
    Midcourse,
    /// Close-in homing.
    Terminal,
    /// Out of play. Write-once: nothing brings a missile back from here.
    Terminated,
}

impl MissilePhase {
    pub fn is_terminated(self) -> bool {
        self == MissilePhase::Terminated
    }
}

/// Cluster lifecycle. One-way: `Active -> Terminated`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClusterStatus {
    #[default]
    Active,
    Terminated,
}

/// Why a cluster reached `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationCause {
    /// Every missile reached its terminated phase during integration.
    MissilesSpent,
    /// `terminate_all` was called (directly, via `remove_cluster`, or `remove_all`).
    Commanded,
    /// Launched with zero missiles.
    Empty,
}
