//! Snapshot builder: reads registry state into a serializable `RegistrySnapshot`.
//!
//! Read-only. It never modifies clusters or targets.

use std::collections::BTreeMap;

use salvo_core::capabilities::TargetHandle;
use salvo_core::state::{RegistrySnapshot, TargetView};
use salvo_core::types::{SimTime, TargetId};

use crate::cluster::ClusterSimulator;

/// Build a complete snapshot from the current registry state.
pub fn build_snapshot(
    time: &SimTime,
    time_scale: f64,
    target_accumulator: f64,
    targets: &BTreeMap<TargetId, TargetHandle>,
    clusters: &[ClusterSimulator],
) -> RegistrySnapshot {
    RegistrySnapshot {
        time: *time,
        time_scale,
        target_accumulator,
        targets: targets
            .values()
            .map(|t| TargetView {
                id: t.id(),
                state: t.state(),
            })
            .collect(),
        clusters: clusters.iter().map(ClusterSimulator::view).collect(),
    }
}
