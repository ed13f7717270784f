//! Cluster simulator: one salvo of missiles sharing a target and a step accumulator.
//!
//! Turns irregular frame deltas into whole fixed-size integration steps. Every
//! step has exactly `simulation_step` seconds, so missile physics never sees a
//! variable remainder regardless of the host frame rate.

use glam::{DAffine3, DQuat, DVec3};
use tracing::{debug, trace, warn};

use salvo_core::capabilities::{
    Missile, MissileLaunch, SpawnCandidate, SpawnFrame, StepContext, TargetHandle,
};
use salvo_core::enums::{ClusterStatus, TerminationCause};
use salvo_core::state::{ClusterView, MissileView};
use salvo_core::types::{ClusterId, MissileHandle, SimRng};

use crate::config::ClusterParameters;

/// Launcher state and timing for a new cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterLaunch {
    pub launcher_position: DVec3,
    pub launcher_velocity: DVec3,
    pub missile_count: usize,
    pub time_to_hit: f64,
}

pub struct ClusterSimulator {
    id: ClusterId,
    missiles: Box<[Box<dyn Missile>]>,
    target: TargetHandle,
    parameters: ClusterParameters,
    step_accumulator: f64,
    time_since_launch: f64,
    time_to_hit: f64,
    steps: u64,
    status: ClusterStatus,
    termination: Option<TerminationCause>,
    /// Slots the spawn generator never filled.
    spawn_shortfall: usize,
}

impl ClusterSimulator {
    /// Build a cluster and place its missiles.
    ///
    /// With a spawn generator, candidates are consumed lazily until `count`
    /// have been accepted or the generator runs dry. Every in-range candidate
    /// is accepted; a later candidate for an occupied slot replaces the earlier
    /// one. Slots never filled fall back to the placement origin so the array
    /// always has `missile_count` entries.
    pub fn new(
        id: ClusterId,
        launch: ClusterLaunch,
        target: TargetHandle,
        parameters: ClusterParameters,
        rng: &mut SimRng,
    ) -> Self {
        let count = launch.missile_count;
        let target_state = target.state();

        let placements: Vec<DAffine3> = (0..count)
            .map(|index| {
                parameters.placement(&SpawnFrame {
                    target: target_state,
                    launcher_position: launch.launcher_position,
                    launcher_velocity: launch.launcher_velocity,
                    index,
                    count,
                })
            })
            .collect();

        let mut slots: Vec<Option<SpawnCandidate>> = vec![None; count];
        let mut accepted = 0;
        if let Some(generator) = parameters.spawn_generator() {
            for candidate in generator.candidates(count, rng) {
                let Some(slot) = slots.get_mut(candidate.index) else {
                    warn!(
                        cluster = %id,
                        index = candidate.index,
                        count,
                        "spawn candidate index out of range, skipped"
                    );
                    continue;
                };
                if slot.replace(candidate).is_some() {
                    trace!(cluster = %id, index = candidate.index, "spawn slot re-placed");
                }
                accepted += 1;
                if accepted == count {
                    break;
                }
            }
        }
        let filled = slots.iter().filter(|slot| slot.is_some()).count();
        let spawn_shortfall = if parameters.spawn_generator().is_some() {
            count - filled
        } else {
            0
        };
        if spawn_shortfall > 0 {
            warn!(
                cluster = %id,
                requested = count,
                placed = filled,
                "spawn slots left unfilled, placing them at the placement origin"
            );
        }

        let distance_scale = parameters.spawn_distance_scale();
        let missiles: Box<[Box<dyn Missile>]> = placements
            .iter()
            .zip(&slots)
            .enumerate()
            .map(|(index, (placement, slot))| {
                let (local, orientation, scale) = match slot {
                    Some(c) => (c.local_position * distance_scale, c.orientation, c.scale),
                    None => (DVec3::ZERO, DQuat::IDENTITY, 1.0),
                };
                let placement_rotation = DQuat::from_mat3(&placement.matrix3);
                parameters.build_missile(&MissileLaunch {
                    handle: MissileHandle::new(id, index),
                    launcher_position: launch.launcher_position,
                    launcher_velocity: launch.launcher_velocity,
                    spawn_position: placement.transform_point3(local),
                    spawn_orientation: placement_rotation * orientation,
                    spawn_scale: scale,
                    time_to_hit: launch.time_to_hit,
                })
            })
            .collect();

        // Vacuously spent: no missiles means all of them are terminated.
        let (status, termination) = if count == 0 {
            (ClusterStatus::Terminated, Some(TerminationCause::Empty))
        } else {
            (ClusterStatus::Active, None)
        };

        debug!(
            cluster = %id,
            target = %target.id(),
            missiles = count,
            step = parameters.simulation_step(),
            "cluster constructed"
        );

        Self {
            id,
            missiles,
            target,
            parameters,
            step_accumulator: 0.0,
            time_since_launch: 0.0,
            time_to_hit: launch.time_to_hit,
            steps: 0,
            status,
            termination,
            spawn_shortfall,
        }
    }

    /// Overwrite the countdown, e.g. after the target maneuvers.
    pub fn update_time_to_hit(&mut self, time_to_hit: f64) {
        self.time_to_hit = time_to_hit;
    }

    /// Terminate every missile and the cluster itself. Idempotent.
    pub fn terminate_all(&mut self) {
        for missile in self.missiles.iter_mut() {
            missile.terminate();
        }
        self.mark_terminated(TerminationCause::Commanded);
    }

    /// Terminate one missile by index. The slot stays in the array.
    pub fn terminate_missile(&mut self, index: usize) -> bool {
        match self.missiles.get_mut(index) {
            Some(missile) => {
                missile.terminate();
                true
            }
            None => false,
        }
    }

    /// Accumulate `elapsed_secs` and fire as many fixed steps as it covers.
    ///
    /// Returns the number of integration steps fired. Non-positive or
    /// non-finite deltas fire nothing and leave the accumulator untouched.
    pub fn update_simulation(&mut self, elapsed_secs: f64, rng: &mut SimRng) -> u32 {
        if !(elapsed_secs.is_finite() && elapsed_secs > 0.0) {
            return 0;
        }

        let step = self.parameters.simulation_step();
        self.step_accumulator += elapsed_secs;

        let mut fired = 0;
        while self.step_accumulator >= step {
            self.integrate_step(step, rng);
            self.step_accumulator -= step;
            fired += 1;
        }
        fired
    }

    /// One fixed step: advance live missiles, recompute termination, move the clocks.
    fn integrate_step(&mut self, step: f64, rng: &mut SimRng) {
        let mut ctx = StepContext {
            target: self.target.state(),
            time_to_hit: self.time_to_hit,
            time_since_launch: self.time_since_launch,
            rng,
        };

        let mut any_live = false;
        for missile in self.missiles.iter_mut() {
            if missile.is_terminated() {
                continue;
            }
            missile.update_execution(step, &mut ctx);
            if !missile.is_terminated() {
                any_live = true;
            }
        }
        if !any_live {
            self.mark_terminated(TerminationCause::MissilesSpent);
        }

        self.time_to_hit -= step;
        self.time_since_launch += step;
        self.steps += 1;
        trace!(
            cluster = %self.id,
            steps = self.steps,
            time_to_hit = self.time_to_hit,
            "integration step"
        );
    }

    fn mark_terminated(&mut self, cause: TerminationCause) {
        if self.status == ClusterStatus::Active {
            self.status = ClusterStatus::Terminated;
            self.termination = Some(cause);
        }
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn target(&self) -> &TargetHandle {
        &self.target
    }

    pub fn parameters(&self) -> &ClusterParameters {
        &self.parameters
    }

    pub fn missile_count(&self) -> usize {
        self.missiles.len()
    }

    pub fn missile(&self, index: usize) -> Option<&dyn Missile> {
        self.missiles.get(index).map(|m| m.as_ref())
    }

    pub fn live_missiles(&self) -> usize {
        self.missiles.iter().filter(|m| !m.is_terminated()).count()
    }

    pub fn step_accumulator(&self) -> f64 {
        self.step_accumulator
    }

    pub fn time_since_launch(&self) -> f64 {
        self.time_since_launch
    }

    pub fn time_to_hit(&self) -> f64 {
        self.time_to_hit
    }

    /// Integration steps fired since launch.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn status(&self) -> ClusterStatus {
        self.status
    }

    pub fn is_terminated(&self) -> bool {
        self.status == ClusterStatus::Terminated
    }

    pub fn termination(&self) -> Option<TerminationCause> {
        self.termination
    }

    pub fn spawn_shortfall(&self) -> usize {
        self.spawn_shortfall
    }

    pub fn view(&self) -> ClusterView {
        ClusterView {
            id: self.id,
            target: self.target.id(),
            status: self.status,
            steps: self.steps,
            step_accumulator: self.step_accumulator,
            time_since_launch: self.time_since_launch,
            time_to_hit: self.time_to_hit,
            live_missiles: self.live_missiles(),
            missiles: self
                .missiles
                .iter()
                .enumerate()
                .map(|(index, m)| MissileView {
                    index,
                    phase: m.phase(),
                    position: m.position(),
                })
                .collect(),
        }
    }
}
