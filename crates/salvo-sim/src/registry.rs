//! Simulation registry: the top of the scheduling hierarchy.
//!
//! `SimulationRegistry` owns every live cluster and the identity-keyed set of
//! targets they fly at. Each host frame it runs the target cadence, forwards
//! the scaled frame time to every cluster, then sweeps terminated clusters.
//! Completely headless, enabling deterministic testing.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rand::SeedableRng;
use tracing::{debug, info, trace, warn};

use salvo_core::capabilities::{Target, TargetHandle};
use salvo_core::constants::{MAX_PENDING_EVENTS, MAX_TIME_SCALE};
use salvo_core::events::SimEvent;
use salvo_core::state::RegistrySnapshot;
use salvo_core::types::{ClusterId, MissileHandle, SimRng, SimTime, TargetId};
use salvo_core::SimError;

use crate::cluster::{ClusterLaunch, ClusterSimulator};
use crate::config::{ClusterParameters, SimConfig};
use crate::snapshot;

/// The simulation registry. Owns all clusters and the shared target set.
pub struct SimulationRegistry {
    clusters: Vec<ClusterSimulator>,
    targets: BTreeMap<TargetId, TargetHandle>,
    target_accumulator: f64,
    target_update_interval: f64,
    time_scale: f64,
    time: SimTime,
    rng: SimRng,
    next_cluster_id: u32,
    next_target_id: u32,
    /// Bounded by `MAX_PENDING_EVENTS`; hosts drain it once per frame.
    events: VecDeque<SimEvent>,
    dropped_events: u64,
}

impl SimulationRegistry {
    /// Create a new registry with the given config.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            clusters: Vec::new(),
            targets: BTreeMap::new(),
            target_accumulator: 0.0,
            target_update_interval: config.target_update_interval,
            time_scale: config.time_scale,
            time: SimTime::default(),
            rng: SimRng::seed_from_u64(config.seed),
            next_cluster_id: 0,
            next_target_id: 0,
            events: VecDeque::new(),
            dropped_events: 0,
        })
    }

    /// Give a target an identity. The returned handle is what clusters share.
    ///
    /// The target joins the update set when the first cluster referencing it
    /// is launched, and leaves it once no live cluster references it.
    pub fn register_target(&mut self, target: impl Target + 'static) -> TargetHandle {
        let id = TargetId(self.next_target_id);
        self.next_target_id += 1;
        TargetHandle::new(id, target)
    }

    /// Construct a cluster, append it to the live set and track its target.
    pub fn launch_cluster(
        &mut self,
        launch: ClusterLaunch,
        target: &TargetHandle,
        parameters: ClusterParameters,
    ) -> ClusterId {
        let id = ClusterId(self.next_cluster_id);
        self.next_cluster_id += 1;

        let cluster = ClusterSimulator::new(id, launch, target.clone(), parameters, &mut self.rng);

        self.push_event(SimEvent::ClusterLaunched {
            cluster: id,
            target: target.id(),
            missiles: launch.missile_count,
        });
        if cluster.spawn_shortfall() > 0 {
            self.push_event(SimEvent::SpawnShortfall {
                cluster: id,
                requested: launch.missile_count,
                placed: launch.missile_count - cluster.spawn_shortfall(),
            });
        }
        if let Some(cause) = cluster.termination() {
            self.push_event(SimEvent::ClusterTerminated {
                cluster: id,
                cause,
                time_since_launch: 0.0,
            });
        }

        self.targets
            .entry(target.id())
            .or_insert_with(|| target.clone());
        self.clusters.push(cluster);

        debug!(
            cluster = %id,
            target = %target.id(),
            clusters = self.clusters.len(),
            targets = self.targets.len(),
            "cluster launched"
        );
        id
    }

    /// Terminate one missile. Its slot stays in the cluster's array.
    pub fn remove_missile(&mut self, missile: MissileHandle) -> Result<(), SimError> {
        let cluster = self
            .cluster_mut(missile.cluster)
            .ok_or(SimError::UnknownCluster(missile.cluster))?;
        if cluster.terminate_missile(missile.index) {
            Ok(())
        } else {
            Err(SimError::UnknownMissile(missile))
        }
    }

    /// Terminate a cluster. It leaves the live set at the next sweep.
    pub fn remove_cluster(&mut self, id: ClusterId) -> Result<(), SimError> {
        let cluster = self.cluster_mut(id).ok_or(SimError::UnknownCluster(id))?;
        let was_terminated = cluster.is_terminated();
        cluster.terminate_all();
        if !was_terminated {
            self.push_terminated(id);
        }
        Ok(())
    }

    /// Terminate every cluster and drop them all immediately.
    pub fn remove_all(&mut self) {
        let mut terminated = Vec::new();
        for cluster in &mut self.clusters {
            if !cluster.is_terminated() {
                terminated.push(cluster.id());
            }
            cluster.terminate_all();
        }
        for id in terminated {
            self.push_terminated(id);
        }

        info!(clusters = self.clusters.len(), "removing all clusters");
        let removed: Vec<ClusterId> = self.clusters.drain(..).map(|c| c.id()).collect();
        for cluster in removed {
            self.push_event(SimEvent::ClusterRemoved { cluster });
        }
        self.targets.clear();
    }

    /// Advance by one host frame of `elapsed_secs` wall-clock seconds.
    ///
    /// Returns the integration steps fired across all clusters.
    pub fn update_simulation(&mut self, elapsed_secs: f64) -> u64 {
        let scaled = if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
            elapsed_secs * self.time_scale
        } else {
            if elapsed_secs != 0.0 {
                warn!(elapsed_secs, "discarding invalid frame delta");
            }
            0.0
        };
        self.time.advance(scaled);

        // 1. Target cadence: one update per distinct target per tick, with catch-up.
        self.target_accumulator += scaled;
        while self.target_accumulator >= self.target_update_interval {
            for target in self.targets.values() {
                target.update(self.target_update_interval);
            }
            self.target_accumulator -= self.target_update_interval;
            trace!(targets = self.targets.len(), "target cadence tick");
        }

        // 2. Every cluster live at frame start sees the same scaled delta.
        let mut newly_terminated = Vec::new();
        let mut fired = 0u64;
        for cluster in &mut self.clusters {
            let was_terminated = cluster.is_terminated();
            fired += u64::from(cluster.update_simulation(scaled, &mut self.rng));
            if !was_terminated && cluster.is_terminated() {
                newly_terminated.push(cluster.id());
            }
        }
        for id in newly_terminated {
            self.push_terminated(id);
        }

        // 3. Sweep after the pass so mid-frame termination never skips a cluster.
        self.sweep();
        fired
    }

    fn sweep(&mut self) {
        let mut removed = Vec::new();
        self.clusters.retain(|cluster| {
            if cluster.is_terminated() {
                removed.push(cluster.id());
                false
            } else {
                true
            }
        });
        if removed.is_empty() {
            return;
        }

        let referenced: BTreeSet<TargetId> =
            self.clusters.iter().map(|c| c.target().id()).collect();
        self.targets.retain(|id, _| referenced.contains(id));
        debug!(
            removed = removed.len(),
            clusters = self.clusters.len(),
            targets = self.targets.len(),
            "swept terminated clusters"
        );
        for cluster in removed {
            self.push_event(SimEvent::ClusterRemoved { cluster });
        }
    }

    fn push_event(&mut self, event: SimEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            if self.dropped_events == 0 {
                warn!(
                    cap = MAX_PENDING_EVENTS,
                    "event buffer full, dropping oldest; drain_events is not being called"
                );
            }
            self.events.pop_front();
            self.dropped_events += 1;
        }
        self.events.push_back(event);
    }

    fn push_terminated(&mut self, id: ClusterId) {
        if let Some(cluster) = self.cluster(id) {
            if let Some(cause) = cluster.termination() {
                let time_since_launch = cluster.time_since_launch();
                self.push_event(SimEvent::ClusterTerminated {
                    cluster: id,
                    cause,
                    time_since_launch,
                });
            }
        }
    }

    /// Number of clusters in the live set (including terminated ones awaiting the sweep).
    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Number of distinct targets on the update cadence.
    pub fn num_targets(&self) -> usize {
        self.targets.len()
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&ClusterSimulator> {
        self.clusters.iter().find(|c| c.id() == id)
    }

    pub fn cluster_mut(&mut self, id: ClusterId) -> Option<&mut ClusterSimulator> {
        self.clusters.iter_mut().find(|c| c.id() == id)
    }

    /// Live clusters in launch order.
    pub fn clusters(&self) -> impl Iterator<Item = &ClusterSimulator> {
        self.clusters.iter()
    }

    /// Tracked targets in id order.
    pub fn targets(&self) -> impl Iterator<Item = &TargetHandle> {
        self.targets.values()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Set the host time multiplier, clamped to `[0, MAX_TIME_SCALE]`.
    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_nan() {
            warn!("ignoring NaN time scale");
            return;
        }
        let clamped = scale.clamp(0.0, MAX_TIME_SCALE);
        if clamped != scale {
            warn!(requested = scale, applied = clamped, "time scale clamped");
        }
        self.time_scale = clamped;
    }

    pub fn target_update_interval(&self) -> f64 {
        self.target_update_interval
    }

    pub fn target_accumulator(&self) -> f64 {
        self.target_accumulator
    }

    /// Hand buffered lifecycle events to the host.
    ///
    /// Call once per frame. Past `MAX_PENDING_EVENTS` undrained events the
    /// oldest are discarded and counted in `dropped_events`.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain(..).collect()
    }

    /// Events discarded because the buffer was full.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        snapshot::build_snapshot(
            &self.time,
            self.time_scale,
            self.target_accumulator,
            &self.targets,
            &self.clusters,
        )
    }
}
