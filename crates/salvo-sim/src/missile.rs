//! Reference missile: phase-driven flight with PN guidance.
//!
//! Manages Boost -> Midcourse -> Terminal -> Terminated transitions and velocity
//! retargeting so missiles track moving targets rather than a fixed aim point.

use glam::DVec3;
use rand::Rng;

use salvo_core::capabilities::{Missile, MissileLaunch, StepContext};
use salvo_core::constants::*;
use salvo_core::enums::MissilePhase;
use salvo_core::types::MissileHandle;

use crate::guidance;

/// Flight envelope for a `GuidedMissile`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissileProfile {
    pub boost_secs: f64,
    pub cruise_speed: f64,
    pub terminal_range: f64,
    pub fuse_range: f64,
    pub max_flight_secs: f64,
    /// Half-width of the uniform aim-point jitter in terminal phase (meters).
    pub seeker_noise: f64,
}

impl Default for MissileProfile {
    fn default() -> Self {
        Self {
            boost_secs: MISSILE_BOOST_SECS,
            cruise_speed: MISSILE_CRUISE_SPEED,
            terminal_range: MISSILE_TERMINAL_RANGE,
            fuse_range: MISSILE_FUSE_RANGE,
            max_flight_secs: MISSILE_MAX_FLIGHT_SECS,
            seeker_noise: 0.0,
        }
    }
}

/// Why a guided missile left flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissileOutcome {
    /// Proximity fuse triggered.
    Detonated,
    /// Flight time limit reached.
    Expired,
    /// Terminated from outside.
    Destroyed,
}

#[derive(Debug, Clone)]
pub struct GuidedMissile {
    handle: MissileHandle,
    profile: MissileProfile,
    phase: MissilePhase,
    position: DVec3,
    velocity: DVec3,
    launch_speed: f64,
    flight_secs: f64,
    phase_secs: f64,
    outcome: Option<MissileOutcome>,
}

impl GuidedMissile {
    pub fn from_launch(launch: &MissileLaunch) -> Self {
        Self::with_profile(launch, MissileProfile::default())
    }

    pub fn with_profile(launch: &MissileLaunch, profile: MissileProfile) -> Self {
        Self {
            handle: launch.handle,
            profile,
            phase: MissilePhase::Boost,
            position: launch.spawn_position,
            velocity: launch.launcher_velocity,
            launch_speed: launch.launcher_velocity.length(),
            flight_secs: 0.0,
            phase_secs: 0.0,
            outcome: None,
        }
    }

    pub fn handle(&self) -> MissileHandle {
        self.handle
    }

    pub fn velocity(&self) -> DVec3 {
        self.velocity
    }

    pub fn flight_secs(&self) -> f64 {
        self.flight_secs
    }

    pub fn outcome(&self) -> Option<MissileOutcome> {
        self.outcome
    }

    fn set_phase(&mut self, phase: MissilePhase) {
        if self.phase != phase {
            self.phase = phase;
            self.phase_secs = 0.0;
        }
    }

    fn finish(&mut self, outcome: MissileOutcome) {
        self.outcome = Some(outcome);
        self.set_phase(MissilePhase::Terminated);
    }
}

impl Missile for GuidedMissile {
    fn update_execution(&mut self, dt: f64, ctx: &mut StepContext<'_>) {
        if self.phase.is_terminated() {
            return;
        }

        let target = ctx.target;
        let range = self.position.distance(target.position);
        if range <= self.profile.fuse_range {
            self.finish(MissileOutcome::Detonated);
            return;
        }

        match self.phase {
            MissilePhase::Boost => {
                // Speed ramps from launcher speed to cruise while pointing at the target.
                let t = ((self.phase_secs + dt) / self.profile.boost_secs).min(1.0);
                let speed =
                    self.launch_speed + (self.profile.cruise_speed - self.launch_speed) * t;
                self.velocity = guidance::pure_pursuit(self.position, target.position, speed);
                if t >= 1.0 {
                    self.set_phase(MissilePhase::Midcourse);
                }
            }
            MissilePhase::Midcourse => {
                if range <= self.profile.terminal_range {
                    self.set_phase(MissilePhase::Terminal);
                }
                self.velocity = guidance::proportional_navigation(
                    self.position,
                    self.velocity,
                    target.position,
                    target.velocity,
                    self.profile.cruise_speed,
                    dt,
                );
            }
            MissilePhase::Terminal => {
                let mut aim = target.position;
                if self.profile.seeker_noise > 0.0 {
                    let n = self.profile.seeker_noise;
                    aim += DVec3::new(
                        ctx.rng.gen_range(-n..=n),
                        ctx.rng.gen_range(-n..=n),
                        ctx.rng.gen_range(-n..=n),
                    );
                }
                self.velocity = guidance::proportional_navigation(
                    self.position,
                    self.velocity,
                    aim,
                    target.velocity,
                    self.profile.cruise_speed,
                    dt,
                );
            }
            MissilePhase::Terminated => {}
        }

        self.position += self.velocity * dt;
        self.flight_secs += dt;
        self.phase_secs += dt;

        if self.position.distance(target.position) <= self.profile.fuse_range {
            self.finish(MissileOutcome::Detonated);
        } else if self.flight_secs >= self.profile.max_flight_secs {
            self.finish(MissileOutcome::Expired);
        }
    }

    fn terminate(&mut self) {
        if !self.phase.is_terminated() {
            self.finish(MissileOutcome::Destroyed);
        }
    }

    fn phase(&self) -> MissilePhase {
        self.phase
    }

    fn position(&self) -> DVec3 {
        self.position
    }
}
