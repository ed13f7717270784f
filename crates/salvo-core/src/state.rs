//! Read-only registry snapshot, serialized for hosts and determinism checks.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::capabilities::TargetState;
use crate::enums::{ClusterStatus, MissilePhase};
use crate::types::{ClusterId, SimTime, TargetId};

/// Complete registry state at a frame boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub time: SimTime,
    pub time_scale: f64,
    pub target_accumulator: f64,
    pub targets: Vec<TargetView>,
    pub clusters: Vec<ClusterView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: TargetId,
    pub state: TargetState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterView {
    pub id: ClusterId,
    pub target: TargetId,
    pub status: ClusterStatus,
    /// Integration steps fired since launch.
    pub steps: u64,
    pub step_accumulator: f64,
    pub time_since_launch: f64,
    pub time_to_hit: f64,
    pub live_missiles: usize,
    pub missiles: Vec<MissileView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissileView {
    pub index: usize,
    pub phase: MissilePhase,
    pub position: DVec3,
}

impl RegistrySnapshot {
    /// Missiles not yet terminated, across all clusters.
    pub fn live_missiles(&self) -> usize {
        self.clusters.iter().map(|c| c.live_missiles).sum()
    }
}
