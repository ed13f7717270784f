//! Demo scenario: a ship engaging two inbound targets with alternating salvos.
//!
//! Salvos cycle through three launch styles (ring, scatter, fan) so a single
//! run exercises both generator kinds, the generator-free path and a
//! non-default integration step. Both targets are shared by several clusters.

use glam::DVec3;
use tracing::info;

use salvo_core::capabilities::TargetHandle;
use salvo_core::constants::{DEFAULT_SIMULATION_STEP, MISSILE_CRUISE_SPEED};
use salvo_core::types::ClusterId;
use salvo_core::SimError;
use salvo_sim::cluster::ClusterLaunch;
use salvo_sim::guidance::estimate_tti;
use salvo_sim::spawn::{fan_out, RingPattern, ScatterPattern};
use salvo_sim::target::{KinematicTarget, Weave};
use salvo_sim::{ClusterParameters, SimulationRegistry};

/// Launching ship: starts at the origin, steaming north.
const SHIP_POSITION: DVec3 = DVec3::new(0.0, 0.0, 10.0);
const SHIP_VELOCITY: DVec3 = DVec3::new(0.0, 12.0, 0.0);

/// Seconds between successive salvos along the ship's track.
const SALVO_SPACING_SECS: f64 = 4.0;

/// Register the demo targets and launch `salvos` clusters of `missiles_per_salvo` each.
pub fn build_demo(
    registry: &mut SimulationRegistry,
    salvos: usize,
    missiles_per_salvo: usize,
) -> Result<Vec<ClusterId>, SimError> {
    // High cruiser weaving on approach from the north.
    let cruiser = registry.register_target(
        KinematicTarget::new(DVec3::new(2_000.0, 18_000.0, 1_500.0), DVec3::new(0.0, -250.0, 0.0))
            .with_weave(Weave {
                amplitude: 30.0,
                frequency: 0.8,
            }),
    );
    // Sea skimmer crossing from the north-west.
    let skimmer = registry.register_target(KinematicTarget::new(
        DVec3::new(-6_000.0, 14_000.0, 30.0),
        DVec3::new(150.0, -200.0, 0.0),
    ));
    let targets = [cruiser, skimmer];

    let mut clusters = Vec::with_capacity(salvos);
    for salvo in 0..salvos {
        let target = &targets[salvo % targets.len()];
        let launcher_position = SHIP_POSITION + SHIP_VELOCITY * SALVO_SPACING_SECS * salvo as f64;
        let launch = ClusterLaunch {
            launcher_position,
            launcher_velocity: SHIP_VELOCITY,
            missile_count: missiles_per_salvo,
            time_to_hit: time_to_hit(launcher_position, target),
        };
        let id = registry.launch_cluster(launch, target, salvo_parameters(salvo)?);
        clusters.push(id);
    }

    info!(
        salvos,
        missiles_per_salvo,
        targets = registry.num_targets(),
        "demo scenario built"
    );
    Ok(clusters)
}

fn salvo_parameters(salvo: usize) -> Result<ClusterParameters, SimError> {
    let parameters = match salvo % 3 {
        0 => ClusterParameters::new(DEFAULT_SIMULATION_STEP)?
            .with_spawn_generator(RingPattern { radius: 15.0 }),
        1 => ClusterParameters::new(DEFAULT_SIMULATION_STEP)?
            .with_spawn_generator(ScatterPattern::new(40.0, 8.0))
            .with_spawn_distance_scale(1.5)?,
        // Fan launches integrate at twice the default rate.
        _ => ClusterParameters::new(DEFAULT_SIMULATION_STEP / 2.0)?
            .with_spawn_transform(fan_out(0.6)),
    };
    Ok(parameters)
}

/// Head-on estimate assuming the missile flies straight at cruise speed.
fn time_to_hit(launcher_position: DVec3, target: &TargetHandle) -> f64 {
    let state = target.state();
    let aim = (state.position - launcher_position).normalize_or_zero();
    estimate_tti(
        launcher_position,
        aim * MISSILE_CRUISE_SPEED,
        state.position,
        state.velocity,
    )
}
