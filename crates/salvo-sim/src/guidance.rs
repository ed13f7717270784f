//! Guidance algorithms for the reference missile.
//!
//! Provides true proportional navigation (PN) with a turn-rate clamp, pure
//! pursuit, and a closing-velocity time-to-intercept estimate.

use glam::DVec3;

use salvo_core::constants::*;

/// Apply True Proportional Navigation (TPN) guidance to compute new missile velocity.
///
/// The acceleration command is proportional to closing velocity and LOS angular rate,
/// applied perpendicular to the line-of-sight. The resulting velocity keeps
/// `missile_speed` (heading change only), clamped by `PN_MAX_TURN_RATE`.
///
/// Falls back to pure pursuit if closing velocity is too low.
pub fn proportional_navigation(
    missile_pos: DVec3,
    missile_vel: DVec3,
    target_pos: DVec3,
    target_vel: DVec3,
    missile_speed: f64,
    dt: f64,
) -> DVec3 {
    let los = target_pos - missile_pos;
    let range_sq = los.length_squared();
    let range = range_sq.sqrt();

    if range < 1.0 {
        return missile_vel;
    }

    let los_u = los / range;
    // Relative velocity (target w.r.t. missile)
    let vrel = target_vel - missile_vel;
    // Closing velocity (positive when approaching)
    let v_closing = -vrel.dot(los_u);

    if v_closing < PN_MIN_CLOSING_SPEED {
        return pure_pursuit(missile_pos, target_pos, missile_speed);
    }

    // LOS angular rate: omega = (LOS x V_rel) / |R|^2
    let omega = los.cross(vrel) / range_sq;
    // a = N * Vc * (omega x LOS_hat)
    let accel = PN_NAVIGATION_CONSTANT * v_closing * omega.cross(los_u);
    let commanded = missile_vel + accel * dt;

    let current_speed = missile_vel.length();
    let new_speed = commanded.length();
    if current_speed < 1.0 || new_speed < 1.0 {
        return pure_pursuit(missile_pos, target_pos, missile_speed);
    }

    let angle = missile_vel.angle_between(commanded);
    let max_angle = PN_MAX_TURN_RATE * dt;

    if angle > max_angle && angle > 1e-6 {
        // Limit turn: interpolate between old and new direction
        let limited = missile_vel.lerp(commanded, max_angle / angle);
        limited.normalize_or_zero() * missile_speed
    } else {
        commanded * (missile_speed / new_speed)
    }
}

/// Velocity pointing directly at the target at constant speed.
pub fn pure_pursuit(from: DVec3, to: DVec3, speed: f64) -> DVec3 {
    let delta = to - from;
    let dist = delta.length();
    if dist > 1.0 {
        delta * (speed / dist)
    } else {
        DVec3::new(0.0, speed, 0.0)
    }
}

/// Estimate time-to-intercept using closing velocity.
///
/// Falls back to combined speed if the objects aren't closing.
pub fn estimate_tti(pos_a: DVec3, vel_a: DVec3, pos_b: DVec3, vel_b: DVec3) -> f64 {
    let delta = pos_b - pos_a;
    let range = delta.length();
    if range < 1.0 {
        return 0.0;
    }

    let v_closing = (vel_a - vel_b).dot(delta / range);
    if v_closing > 1.0 {
        range / v_closing
    } else {
        let speed = vel_a.length() + vel_b.length();
        if speed > 1.0 {
            range / speed
        } else {
            f64::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    /// Fly missile and target forward with PN until the range closes or steps run out.
    fn min_range_under_pn(
        mut m_pos: DVec3,
        mut m_vel: DVec3,
        mut t_pos: DVec3,
        t_vel: impl Fn(f64) -> DVec3,
    ) -> f64 {
        let speed = MISSILE_CRUISE_SPEED;
        let mut min_range = f64::MAX;

        for step in 0..10_000 {
            let range = m_pos.distance(t_pos);
            min_range = min_range.min(range);
            if range < 100.0 {
                break;
            }
            let tv = t_vel(step as f64 * DT);
            m_vel = proportional_navigation(m_pos, m_vel, t_pos, tv, speed, DT);
            m_pos += m_vel * DT;
            t_pos += tv * DT;
        }
        min_range
    }

    #[test]
    fn test_pn_intercepts_head_on_target() {
        let min_range = min_range_under_pn(
            DVec3::new(0.0, 0.0, 100.0),
            DVec3::new(0.0, MISSILE_CRUISE_SPEED, 50.0),
            DVec3::new(0.0, 30_000.0, 3_000.0),
            |_| DVec3::new(0.0, -250.0, 0.0),
        );
        assert!(
            min_range < 100.0,
            "PN should converge on head-on target, min range: {min_range:.1}m"
        );
    }

    #[test]
    fn test_pn_intercepts_crossing_target() {
        let min_range = min_range_under_pn(
            DVec3::new(0.0, 0.0, 100.0),
            DVec3::new(0.0, MISSILE_CRUISE_SPEED, 0.0),
            DVec3::new(8_000.0, 20_000.0, 3_000.0),
            |_| DVec3::new(-250.0, 0.0, 0.0),
        );
        assert!(
            min_range < 100.0,
            "PN should converge on crossing target, min range: {min_range:.1}m"
        );
    }

    #[test]
    fn test_pn_intercepts_weaving_target() {
        let min_range = min_range_under_pn(
            DVec3::new(0.0, 0.0, 100.0),
            DVec3::new(0.0, MISSILE_CRUISE_SPEED, 50.0),
            DVec3::new(3_000.0, 25_000.0, 3_000.0),
            |t| DVec3::new(150.0 * (t * 0.5).sin(), -250.0, 0.0),
        );
        assert!(
            min_range < 300.0,
            "PN should converge on weaving target, min range: {min_range:.1}m"
        );
    }

    #[test]
    fn test_pn_keeps_speed() {
        let vel = proportional_navigation(
            DVec3::ZERO,
            DVec3::new(0.0, 800.0, 0.0),
            DVec3::new(5_000.0, 10_000.0, 0.0),
            DVec3::new(-200.0, 0.0, 0.0),
            800.0,
            DT,
        );
        assert!((vel.length() - 800.0).abs() < 1e-6);
    }

    #[test]
    fn test_pure_pursuit_points_at_target() {
        let vel = pure_pursuit(DVec3::ZERO, DVec3::new(300.0, 400.0, 0.0), 100.0);
        assert!((vel - DVec3::new(60.0, 80.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_tti_estimate_head_on() {
        let tti = estimate_tti(
            DVec3::ZERO,
            DVec3::new(0.0, 900.0, 0.0),
            DVec3::new(0.0, 23_000.0, 0.0),
            DVec3::new(0.0, -250.0, 0.0),
        );
        let expected = 23_000.0 / 1_150.0;
        assert!((tti - expected).abs() < 1e-9, "expected {expected}, got {tti}");
    }

    #[test]
    fn test_tti_not_closing_uses_combined_speed() {
        let tti = estimate_tti(
            DVec3::ZERO,
            DVec3::new(0.0, -100.0, 0.0),
            DVec3::new(0.0, 1_000.0, 0.0),
            DVec3::new(0.0, 100.0, 0.0),
        );
        assert!((tti - 5.0).abs() < 1e-9);
    }
}
