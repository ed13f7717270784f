//! Simulation constants and tuning parameters.

// --- Scheduling ---

/// Default missile integration rate (Hz).
pub const DEFAULT_STEP_RATE: u32 = 60;

/// Default fixed integration step (seconds).
pub const DEFAULT_SIMULATION_STEP: f64 = 1.0 / DEFAULT_STEP_RATE as f64;

/// Default target refresh interval (seconds). Coarser than the missile step.
pub const DEFAULT_TARGET_UPDATE_INTERVAL: f64 = 0.1;

/// Default host time multiplier.
pub const DEFAULT_TIME_SCALE: f64 = 1.0;

/// Upper clamp for `set_time_scale`.
pub const MAX_TIME_SCALE: f64 = 4.0;

/// Default RNG seed. Same seed = same simulation.
pub const DEFAULT_SEED: u64 = 42;

/// Lifecycle events a registry buffers before it starts dropping the oldest.
pub const MAX_PENDING_EVENTS: usize = 4096;

// --- Spawning ---

/// Default multiplier applied to generator offsets before placement.
pub const DEFAULT_SPAWN_DISTANCE_SCALE: f64 = 1.0;

/// Candidate draws a `ScatterPattern` may spend per requested missile.
pub const SCATTER_ATTEMPTS_PER_MISSILE: usize = 30;

// --- Reference missile ---

/// Boost phase duration (seconds).
pub const MISSILE_BOOST_SECS: f64 = 1.5;

/// Cruise speed reached at end of boost (m/s).
pub const MISSILE_CRUISE_SPEED: f64 = 900.0;

/// Range at which the missile switches to terminal homing (meters).
pub const MISSILE_TERMINAL_RANGE: f64 = 2_000.0;

/// Proximity fuse radius (meters).
pub const MISSILE_FUSE_RANGE: f64 = 20.0;

/// Hard flight time limit (seconds).
pub const MISSILE_MAX_FLIGHT_SECS: f64 = 60.0;

// --- Guidance ---

/// Proportional navigation constant (N). Typical range 3-5.
pub const PN_NAVIGATION_CONSTANT: f64 = 4.0;

/// Maximum turn rate for PN guidance (radians per second).
pub const PN_MAX_TURN_RATE: f64 = 0.8;

/// Below this closing velocity PN falls back to pure pursuit (m/s).
pub const PN_MIN_CLOSING_SPEED: f64 = 10.0;
