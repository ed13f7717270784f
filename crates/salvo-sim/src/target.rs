//! Reference target: straight-line cruise with an optional lateral weave.

use glam::DVec3;

use salvo_core::capabilities::{Target, TargetState};

/// Sinusoidal side-to-side motion layered on top of the cruise velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weave {
    /// Peak lateral speed (m/s).
    pub amplitude: f64,
    /// Angular frequency (rad/s).
    pub frequency: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KinematicTarget {
    position: DVec3,
    cruise_velocity: DVec3,
    weave: Option<Weave>,
    elapsed_secs: f64,
}

impl KinematicTarget {
    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self {
            position,
            cruise_velocity: velocity,
            weave: None,
            elapsed_secs: 0.0,
        }
    }

    pub fn stationary(position: DVec3) -> Self {
        Self::new(position, DVec3::ZERO)
    }

    pub fn with_weave(mut self, weave: Weave) -> Self {
        self.weave = Some(weave);
        self
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Horizontal unit vector perpendicular to the cruise heading (z is up).
    fn lateral_axis(&self) -> DVec3 {
        DVec3::new(-self.cruise_velocity.y, self.cruise_velocity.x, 0.0).normalize_or_zero()
    }

    fn current_velocity(&self) -> DVec3 {
        match self.weave {
            Some(weave) => {
                let lateral = weave.amplitude * (weave.frequency * self.elapsed_secs).sin();
                self.cruise_velocity + self.lateral_axis() * lateral
            }
            None => self.cruise_velocity,
        }
    }
}

impl Target for KinematicTarget {
    fn update(&mut self, dt: f64) {
        self.position += self.current_velocity() * dt;
        self.elapsed_secs += dt;
    }

    fn state(&self) -> TargetState {
        TargetState {
            position: self.position,
            velocity: self.current_velocity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cruise_integrates_position() {
        let mut target = KinematicTarget::new(DVec3::ZERO, DVec3::new(0.0, -250.0, 0.0));
        for _ in 0..10 {
            target.update(0.1);
        }
        let state = target.state();
        assert!((state.position.y + 250.0).abs() < 1e-9);
        assert_eq!(state.velocity, DVec3::new(0.0, -250.0, 0.0));
    }

    #[test]
    fn test_weave_is_lateral_only() {
        let mut target = KinematicTarget::new(DVec3::ZERO, DVec3::new(0.0, 200.0, 0.0))
            .with_weave(Weave {
                amplitude: 50.0,
                frequency: 1.0,
            });
        target.update(0.5);
        let vel = target.state().velocity;

        // Lateral axis for a northbound target is west (-x).
        assert!((vel.y - 200.0).abs() < 1e-9);
        assert!((vel.x + 50.0 * 0.5_f64.sin()).abs() < 1e-9);
        assert_eq!(vel.z, 0.0);
    }

    #[test]
    fn test_stationary_never_moves() {
        let mut target = KinematicTarget::stationary(DVec3::new(1.0, 2.0, 3.0));
        target.update(100.0);
        assert_eq!(target.state().position, DVec3::new(1.0, 2.0, 3.0));
    }
}
