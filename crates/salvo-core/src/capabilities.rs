//! Capability traits the engine consumes, plus the plain data passed across them.
//!
//! The engine decides *when* targets update, missiles execute and spawn
//! candidates are drawn. *How* each of those happens lives behind these traits.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::enums::MissilePhase;
use crate::types::{MissileHandle, SimRng, TargetId};

/// Kinematic state of a target as seen by missiles and spawn transforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    pub position: DVec3,
    pub velocity: DVec3,
}

/// Something missiles fly at. Updated on the registry's target cadence.
pub trait Target {
    /// Advance the target's own motion/AI by `dt` seconds.
    fn update(&mut self, dt: f64);

    /// Current kinematic state.
    fn state(&self) -> TargetState;
}

/// Shared reference to a registered target.
///
/// Identity is the `TargetId`, not the pointee: two handles are the same
/// target exactly when their ids match. Handles are cheap to clone; the
/// registry keeps one per distinct target and every cluster keeps one more.
#[derive(Clone)]
pub struct TargetHandle {
    id: TargetId,
    inner: Rc<RefCell<dyn Target>>,
}

impl TargetHandle {
    pub fn new(id: TargetId, target: impl Target + 'static) -> Self {
        let inner: Rc<RefCell<dyn Target>> = Rc::new(RefCell::new(target));
        Self { id, inner }
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn state(&self) -> TargetState {
        self.inner.borrow().state()
    }

    pub fn update(&self, dt: f64) {
        self.inner.borrow_mut().update(dt);
    }
}

impl fmt::Debug for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetHandle")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

/// Everything a missile is told when its cluster builds it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissileLaunch {
    /// Owning cluster and slot index.
    pub handle: MissileHandle,
    pub launcher_position: DVec3,
    pub launcher_velocity: DVec3,
    /// World-space spawn point.
    pub spawn_position: DVec3,
    /// Candidate orientation composed with the placement rotation.
    pub spawn_orientation: DQuat,
    /// Per-candidate scale reported by the spawn generator (1.0 without one).
    pub spawn_scale: f64,
    /// Cluster time-to-hit at launch.
    pub time_to_hit: f64,
}

/// Per-step view handed to each live missile.
pub struct StepContext<'a> {
    /// Target state sampled once at the start of the step.
    pub target: TargetState,
    /// Cluster countdown before this step is subtracted.
    pub time_to_hit: f64,
    /// Cluster elapsed time before this step is added.
    pub time_since_launch: f64,
    pub rng: &'a mut SimRng,
}

/// A guided projectile owned by a cluster.
pub trait Missile {
    /// Run one fixed integration step of `dt` seconds.
    fn update_execution(&mut self, dt: f64, ctx: &mut StepContext<'_>);

    /// Force the terminated phase. Must be idempotent.
    fn terminate(&mut self);

    fn phase(&self) -> MissilePhase;

    fn position(&self) -> DVec3;

    fn is_terminated(&self) -> bool {
        self.phase().is_terminated()
    }
}

/// One candidate spawn point in the cluster's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnCandidate {
    /// Slot the candidate is meant for, `0..count`.
    pub index: usize,
    pub scale: f64,
    pub local_position: DVec3,
    pub orientation: DQuat,
}

/// Produces candidate spawn points for a cluster.
///
/// The returned iterator is lazy. The cluster accepts every candidate whose
/// index is in `0..count` and stops pulling after `count` acceptances; a
/// repeated index replaces the earlier placement for that slot. Out-of-range
/// indices are skipped. The iterator may end early if it runs out of
/// attempts, in which case the cluster fills the missing slots itself.
pub trait SpawnGenerator {
    fn candidates<'a>(
        &'a self,
        count: usize,
        rng: &'a mut SimRng,
    ) -> Box<dyn Iterator<Item = SpawnCandidate> + 'a>;
}

/// Inputs to a per-missile placement transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnFrame {
    pub target: TargetState,
    pub launcher_position: DVec3,
    pub launcher_velocity: DVec3,
    pub index: usize,
    pub count: usize,
}
