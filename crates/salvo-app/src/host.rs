//! Host loop: drives the registry with variable frame deltas.
//!
//! Frame times wander around a nominal rate with seeded jitter, so the
//! fixed-step integration underneath sees the same uneven input a rendering
//! host would produce while staying reproducible.

use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use salvo_core::constants::DEFAULT_SEED;
use salvo_core::events::SimEvent;
use salvo_core::types::SimRng;
use salvo_sim::SimulationRegistry;

/// Nominal host frame rate (Hz).
pub const DEFAULT_HOST_FPS: f64 = 60.0;

/// Largest fractional deviation a jittered frame may have from nominal.
pub const MAX_JITTER: f64 = 0.9;

/// Decorrelates the jitter stream from a registry seeded with the same value.
const JITTER_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostSettings {
    /// Nominal frames per second.
    pub fps: f64,
    /// Fractional frame-time jitter, e.g. 0.25 = +/-25%.
    pub jitter: f64,
    pub seed: u64,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_HOST_FPS,
            jitter: 0.25,
            seed: DEFAULT_SEED,
        }
    }
}

/// Totals accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub steps: u64,
    pub host_secs: f64,
    pub sim_secs: f64,
    pub clusters_launched: usize,
    pub clusters_terminated: usize,
    pub clusters_removed: usize,
    pub spawn_shortfalls: usize,
    pub clusters_remaining: usize,
}

pub struct HostLoop {
    registry: SimulationRegistry,
    settings: HostSettings,
    rng: SimRng,
    summary: RunSummary,
}

impl HostLoop {
    /// Frame rates below 1 Hz and jitter outside `[0, MAX_JITTER]` are clamped.
    pub fn new(registry: SimulationRegistry, settings: HostSettings) -> Self {
        let settings = HostSettings {
            fps: if settings.fps.is_finite() {
                settings.fps.max(1.0)
            } else {
                DEFAULT_HOST_FPS
            },
            jitter: if settings.jitter.is_nan() {
                0.0
            } else {
                settings.jitter.clamp(0.0, MAX_JITTER)
            },
            seed: settings.seed,
        };
        Self {
            registry,
            rng: SimRng::seed_from_u64(settings.seed ^ JITTER_SEED_SALT),
            settings,
            summary: RunSummary::default(),
        }
    }

    pub fn nominal_frame_secs(&self) -> f64 {
        1.0 / self.settings.fps
    }

    fn next_delta(&mut self) -> f64 {
        let nominal = self.nominal_frame_secs();
        let jitter = self.settings.jitter;
        if jitter > 0.0 {
            nominal * (1.0 + self.rng.gen_range(-jitter..=jitter))
        } else {
            nominal
        }
    }

    /// Run one host frame and return the lifecycle events it produced.
    pub fn run_frame(&mut self) -> Vec<SimEvent> {
        let dt = self.next_delta();
        let steps = self.registry.update_simulation(dt);

        self.summary.frames += 1;
        self.summary.steps += steps;
        self.summary.host_secs += dt;
        self.summary.sim_secs = self.registry.time().elapsed_secs;

        let events = self.registry.drain_events();
        self.tally(&events);
        events
    }

    /// Run until every cluster has been swept or `max_frames` frames elapse.
    pub fn run(&mut self, max_frames: u64) -> RunSummary {
        let pending = self.registry.drain_events();
        self.tally(&pending);

        let report_every = self.settings.fps.round() as u64;
        for _ in 0..max_frames {
            if self.registry.num_clusters() == 0 {
                break;
            }
            self.run_frame();
            if report_every > 0 && self.summary.frames % report_every == 0 {
                debug!(
                    frame = self.summary.frames,
                    sim_secs = self.summary.sim_secs,
                    clusters = self.registry.num_clusters(),
                    live_missiles = self.registry.snapshot().live_missiles(),
                    "host frame"
                );
            }
        }

        self.summary.clusters_remaining = self.registry.num_clusters();
        info!(
            frames = self.summary.frames,
            steps = self.summary.steps,
            sim_secs = self.summary.sim_secs,
            removed = self.summary.clusters_removed,
            remaining = self.summary.clusters_remaining,
            "host run finished"
        );
        self.summary
    }

    fn tally(&mut self, events: &[SimEvent]) {
        for event in events {
            match event {
                SimEvent::ClusterLaunched { .. } => self.summary.clusters_launched += 1,
                SimEvent::SpawnShortfall { .. } => self.summary.spawn_shortfalls += 1,
                SimEvent::ClusterTerminated { .. } => self.summary.clusters_terminated += 1,
                SimEvent::ClusterRemoved { .. } => self.summary.clusters_removed += 1,
            }
        }
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn settings(&self) -> HostSettings {
        self.settings
    }

    pub fn registry(&self) -> &SimulationRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SimulationRegistry {
        &mut self.registry
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use salvo_sim::cluster::ClusterLaunch;
    use salvo_sim::target::KinematicTarget;
    use salvo_sim::{ClusterParameters, SimConfig};

    use super::*;

    fn registry_with_salvo(seed: u64) -> SimulationRegistry {
        let mut registry = SimulationRegistry::new(SimConfig {
            seed,
            ..Default::default()
        })
        .unwrap();
        let target =
            registry.register_target(KinematicTarget::stationary(DVec3::new(0.0, 3_000.0, 500.0)));
        registry.launch_cluster(
            ClusterLaunch {
                launcher_position: DVec3::ZERO,
                launcher_velocity: DVec3::ZERO,
                missile_count: 2,
                time_to_hit: 4.0,
            },
            &target,
            ClusterParameters::default(),
        );
        registry
    }

    #[test]
    fn test_jitter_stays_in_band() {
        let mut host = HostLoop::new(
            registry_with_salvo(1),
            HostSettings {
                fps: 50.0,
                jitter: 0.3,
                seed: 5,
            },
        );
        for _ in 0..500 {
            let dt = host.next_delta();
            assert!(dt >= 0.02 * 0.7 - 1e-12 && dt <= 0.02 * 1.3 + 1e-12, "dt {dt}");
        }
    }

    #[test]
    fn test_settings_clamped() {
        let host = HostLoop::new(
            registry_with_salvo(1),
            HostSettings {
                fps: 0.0,
                jitter: 5.0,
                seed: 0,
            },
        );
        assert_eq!(host.settings().fps, 1.0);
        assert_eq!(host.settings().jitter, MAX_JITTER);
    }

    #[test]
    fn test_frame_limit_respected() {
        let mut host = HostLoop::new(registry_with_salvo(1), HostSettings::default());
        let summary = host.run(10);
        assert_eq!(summary.frames, 10);
        assert_eq!(summary.clusters_launched, 1);
        assert_eq!(summary.clusters_remaining, 1);
        assert!((summary.sim_secs - summary.host_secs).abs() < 1e-9);
    }

    #[test]
    fn test_run_until_empty() {
        let mut host = HostLoop::new(registry_with_salvo(1), HostSettings::default());
        let summary = host.run(60 * 120);

        assert_eq!(summary.clusters_remaining, 0);
        assert_eq!(summary.clusters_terminated, 1);
        assert_eq!(summary.clusters_removed, 1);
        assert!(summary.frames < 60 * 120);
        assert!(summary.steps > 0);
    }

    #[test]
    fn test_time_scale_doubles_sim_time() {
        let mut registry = registry_with_salvo(1);
        registry.set_time_scale(2.0);
        let mut host = HostLoop::new(registry, HostSettings::default());
        let summary = host.run(30);
        assert!((summary.sim_secs - 2.0 * summary.host_secs).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed| {
            let mut host = HostLoop::new(
                registry_with_salvo(seed),
                HostSettings {
                    seed,
                    ..Default::default()
                },
            );
            host.run(120);
            serde_json::to_string(&host.registry().snapshot()).unwrap()
        };
        assert_eq!(run(9), run(9));
    }
}
