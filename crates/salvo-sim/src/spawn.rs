//! Spawn placement: per-missile transforms and candidate generators.
//!
//! Local spawn frame convention: +Y points from the launcher at the target,
//! X/Z span the plane across the line of fire. World z is up.

use std::f64::consts::TAU;

use glam::{DAffine3, DQuat, DVec3};
use rand::Rng;

use salvo_core::capabilities::{SpawnCandidate, SpawnFrame, SpawnGenerator};
use salvo_core::constants::SCATTER_ATTEMPTS_PER_MISSILE;
use salvo_core::types::SimRng;

/// Rotation taking local +Y onto the launcher-to-target line.
fn aim_rotation(frame: &SpawnFrame) -> DQuat {
    let forward = (frame.target.position - frame.launcher_position).normalize_or_zero();
    if forward == DVec3::ZERO {
        DQuat::IDENTITY
    } else {
        DQuat::from_rotation_arc(DVec3::Y, forward)
    }
}

/// Every missile shares one frame: origin at the launcher, aimed at the target.
pub fn launcher_frame(frame: &SpawnFrame) -> DAffine3 {
    DAffine3::from_rotation_translation(aim_rotation(frame), frame.launcher_position)
}

/// Spread missiles evenly across `spread` radians of yaw, centred on the target line.
pub fn fan_out(spread: f64) -> impl Fn(&SpawnFrame) -> DAffine3 {
    move |frame| {
        let yaw = if frame.count > 1 {
            spread * (frame.index as f64 / (frame.count - 1) as f64 - 0.5)
        } else {
            0.0
        };
        let rotation = DQuat::from_rotation_z(yaw) * aim_rotation(frame);
        DAffine3::from_rotation_translation(rotation, frame.launcher_position)
    }
}

/// Evenly spaced points on a circle across the line of fire. Never rejects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPattern {
    pub radius: f64,
}

impl SpawnGenerator for RingPattern {
    fn candidates<'a>(
        &'a self,
        count: usize,
        _rng: &'a mut SimRng,
    ) -> Box<dyn Iterator<Item = SpawnCandidate> + 'a> {
        let radius = self.radius;
        Box::new((0..count).map(move |index| {
            let angle = TAU * index as f64 / count as f64;
            SpawnCandidate {
                index,
                scale: 1.0,
                local_position: DVec3::new(radius * angle.cos(), 0.0, radius * angle.sin()),
                orientation: DQuat::from_rotation_y(angle),
            }
        }))
    }
}

/// Random points in a disc with a minimum spacing (rejection sampling).
///
/// Each requested missile gets `attempts_per_missile` draws worth of budget.
/// When the budget runs out the sequence ends, possibly short.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPattern {
    pub radius: f64,
    pub min_separation: f64,
    pub attempts_per_missile: usize,
}

impl ScatterPattern {
    pub fn new(radius: f64, min_separation: f64) -> Self {
        Self {
            radius,
            min_separation,
            attempts_per_missile: SCATTER_ATTEMPTS_PER_MISSILE,
        }
    }
}

impl SpawnGenerator for ScatterPattern {
    fn candidates<'a>(
        &'a self,
        count: usize,
        rng: &'a mut SimRng,
    ) -> Box<dyn Iterator<Item = SpawnCandidate> + 'a> {
        Box::new(ScatterCandidates {
            pattern: self,
            rng,
            accepted: Vec::with_capacity(count),
            count,
            attempts_left: count.saturating_mul(self.attempts_per_missile),
        })
    }
}

struct ScatterCandidates<'a> {
    pattern: &'a ScatterPattern,
    rng: &'a mut SimRng,
    accepted: Vec<DVec3>,
    count: usize,
    attempts_left: usize,
}

impl Iterator for ScatterCandidates<'_> {
    type Item = SpawnCandidate;

    fn next(&mut self) -> Option<SpawnCandidate> {
        while self.accepted.len() < self.count && self.attempts_left > 0 {
            self.attempts_left -= 1;

            // Uniform over the disc area.
            let r = self.pattern.radius * self.rng.gen::<f64>().sqrt();
            let theta = self.rng.gen_range(0.0..TAU);
            let point = DVec3::new(r * theta.cos(), 0.0, r * theta.sin());

            let min_sq = self.pattern.min_separation * self.pattern.min_separation;
            if self
                .accepted
                .iter()
                .any(|p| p.distance_squared(point) < min_sq)
            {
                continue;
            }

            let index = self.accepted.len();
            self.accepted.push(point);
            return Some(SpawnCandidate {
                index,
                scale: 1.0,
                local_position: point,
                orientation: DQuat::from_rotation_y(theta),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use salvo_core::capabilities::TargetState;

    use super::*;

    fn frame(index: usize, count: usize) -> SpawnFrame {
        SpawnFrame {
            target: TargetState {
                position: DVec3::new(1_000.0, 0.0, 10.0),
                velocity: DVec3::ZERO,
            },
            launcher_position: DVec3::new(0.0, 0.0, 10.0),
            launcher_velocity: DVec3::ZERO,
            index,
            count,
        }
    }

    #[test]
    fn test_launcher_frame_aims_local_y_at_target() {
        let f = frame(0, 1);
        let txfm = launcher_frame(&f);

        let ahead = txfm.transform_point3(DVec3::new(0.0, 100.0, 0.0));
        assert!((ahead - DVec3::new(100.0, 0.0, 10.0)).length() < 1e-9);
        assert_eq!(txfm.transform_point3(DVec3::ZERO), f.launcher_position);
    }

    #[test]
    fn test_fan_out_is_symmetric() {
        let fan = fan_out(1.0);
        let left = fan(&frame(0, 3)).transform_vector3(DVec3::Y);
        let mid = fan(&frame(1, 3)).transform_vector3(DVec3::Y);
        let right = fan(&frame(2, 3)).transform_vector3(DVec3::Y);

        let aim = launcher_frame(&frame(1, 3)).transform_vector3(DVec3::Y);
        assert!((mid - aim).length() < 1e-9);
        assert!((left.angle_between(aim) - 0.5).abs() < 1e-9);
        assert!((right.angle_between(aim) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_ring_offers_every_index_once() {
        let mut rng = SimRng::seed_from_u64(0);
        let ring = RingPattern { radius: 10.0 };
        let candidates: Vec<_> = ring.candidates(6, &mut rng).collect();

        assert_eq!(candidates.len(), 6);
        for (i, c) in candidates.iter().enumerate() {
            assert_eq!(c.index, i);
            assert!((c.local_position.length() - 10.0).abs() < 1e-9);
            assert_eq!(c.local_position.y, 0.0);
        }
    }

    #[test]
    fn test_scatter_respects_separation() {
        let mut rng = SimRng::seed_from_u64(9);
        let scatter = ScatterPattern::new(100.0, 15.0);
        let candidates: Vec<_> = scatter.candidates(8, &mut rng).collect();

        assert_eq!(candidates.len(), 8);
        for (i, a) in candidates.iter().enumerate() {
            assert!(a.local_position.length() <= 100.0 + 1e-9);
            for b in &candidates[i + 1..] {
                assert!(a.local_position.distance(b.local_position) >= 15.0);
            }
        }
    }

    #[test]
    fn test_scatter_exhausts_budget() {
        let mut rng = SimRng::seed_from_u64(3);
        // Separation larger than the disc: only the first draw can ever fit.
        let scatter = ScatterPattern::new(1.0, 10.0);
        let candidates: Vec<_> = scatter.candidates(5, &mut rng).collect();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_scatter_same_seed_same_points() {
        let scatter = ScatterPattern::new(50.0, 5.0);
        let mut a = SimRng::seed_from_u64(77);
        let mut b = SimRng::seed_from_u64(77);
        let pa: Vec<_> = scatter.candidates(10, &mut a).collect();
        let pb: Vec<_> = scatter.candidates(10, &mut b).collect();
        assert_eq!(pa, pb);
    }
}
