//! Registry configuration and per-cluster parameters.

use std::fmt;
use std::rc::Rc;

use glam::DAffine3;
use serde::{Deserialize, Serialize};

use salvo_core::capabilities::{Missile, MissileLaunch, SpawnFrame, SpawnGenerator};
use salvo_core::constants::*;
use salvo_core::SimError;

use crate::missile::GuidedMissile;
use crate::spawn;

/// Configuration for starting a new simulation registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal), in `[0, MAX_TIME_SCALE]`.
    pub time_scale: f64,
    /// Seconds between batched target updates.
    pub target_update_interval: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            time_scale: DEFAULT_TIME_SCALE,
            target_update_interval: DEFAULT_TARGET_UPDATE_INTERVAL,
        }
    }
}

impl SimConfig {
    /// Parse a JSON config document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.target_update_interval.is_finite() && self.target_update_interval > 0.0) {
            return Err(SimError::InvalidTargetInterval(self.target_update_interval));
        }
        if !(self.time_scale.is_finite() && (0.0..=MAX_TIME_SCALE).contains(&self.time_scale)) {
            return Err(SimError::InvalidTimeScale(self.time_scale));
        }
        Ok(())
    }
}

/// Per-missile placement transform: maps the cluster's local spawn frame into world space.
pub type SpawnTransform = Rc<dyn Fn(&SpawnFrame) -> DAffine3>;

/// Builds the missile collaborator for one slot.
pub type MissileFactory = Rc<dyn Fn(&MissileLaunch) -> Box<dyn Missile>>;

/// Cluster-wide parameters. Immutable once handed to a cluster.
///
/// Cloning is cheap: the transform, generator and factory are reference counted,
/// so many clusters can share one parameter set.
#[derive(Clone)]
pub struct ClusterParameters {
    simulation_step: f64,
    spawn_transform: SpawnTransform,
    spawn_generator: Option<Rc<dyn SpawnGenerator>>,
    spawn_distance_scale: f64,
    missile_factory: MissileFactory,
}

impl ClusterParameters {
    /// Parameters with the given fixed step and default spawn/missile behaviour.
    pub fn new(simulation_step: f64) -> Result<Self, SimError> {
        if !(simulation_step.is_finite() && simulation_step > 0.0) {
            return Err(SimError::InvalidSimulationStep(simulation_step));
        }
        Ok(Self {
            simulation_step,
            ..Self::default()
        })
    }

    pub fn with_spawn_transform(
        mut self,
        transform: impl Fn(&SpawnFrame) -> DAffine3 + 'static,
    ) -> Self {
        self.spawn_transform = Rc::new(transform);
        self
    }

    pub fn with_spawn_generator(mut self, generator: impl SpawnGenerator + 'static) -> Self {
        self.spawn_generator = Some(Rc::new(generator));
        self
    }

    pub fn with_spawn_distance_scale(mut self, scale: f64) -> Result<Self, SimError> {
        if !(scale.is_finite() && scale >= 0.0) {
            return Err(SimError::InvalidDistanceScale(scale));
        }
        self.spawn_distance_scale = scale;
        Ok(self)
    }

    pub fn with_missile_factory(
        mut self,
        factory: impl Fn(&MissileLaunch) -> Box<dyn Missile> + 'static,
    ) -> Self {
        self.missile_factory = Rc::new(factory);
        self
    }

    pub fn simulation_step(&self) -> f64 {
        self.simulation_step
    }

    pub fn spawn_distance_scale(&self) -> f64 {
        self.spawn_distance_scale
    }

    pub fn spawn_generator(&self) -> Option<&dyn SpawnGenerator> {
        self.spawn_generator.as_deref()
    }

    pub fn placement(&self, frame: &SpawnFrame) -> DAffine3 {
        (self.spawn_transform)(frame)
    }

    pub fn build_missile(&self, launch: &MissileLaunch) -> Box<dyn Missile> {
        (self.missile_factory)(launch)
    }
}

impl Default for ClusterParameters {
    fn default() -> Self {
        Self {
            simulation_step: DEFAULT_SIMULATION_STEP,
            spawn_transform: Rc::new(spawn::launcher_frame),
            spawn_generator: None,
            spawn_distance_scale: DEFAULT_SPAWN_DISTANCE_SCALE,
            missile_factory: Rc::new(guided_missile),
        }
    }
}

fn guided_missile(launch: &MissileLaunch) -> Box<dyn Missile> {
    Box::new(GuidedMissile::from_launch(launch))
}

impl fmt::Debug for ClusterParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterParameters")
            .field("simulation_step", &self.simulation_step)
            .field("spawn_generator", &self.spawn_generator.is_some())
            .field("spawn_distance_scale", &self.spawn_distance_scale)
            .finish_non_exhaustive()
    }
}
