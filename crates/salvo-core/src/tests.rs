#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::capabilities::{Target, TargetHandle, TargetState};
    use crate::enums::*;
    use crate::error::SimError;
    use crate::events::SimEvent;
    use crate::state::{ClusterView, MissileView, RegistrySnapshot};
    use crate::types::{ClusterId, MissileHandle, SimTime, TargetId};

    struct Drifter {
        state: TargetState,
    }

    impl Target for Drifter {
        fn update(&mut self, dt: f64) {
            self.state.position += self.state.velocity * dt;
        }

        fn state(&self) -> TargetState {
            self.state
        }
    }

    fn drifter() -> Drifter {
        Drifter {
            state: TargetState {
                position: DVec3::ZERO,
                velocity: DVec3::new(10.0, 0.0, 0.0),
            },
        }
    }

    #[test]
    fn test_target_handle_clones_share_state() {
        let a = TargetHandle::new(TargetId(7), drifter());
        let b = a.clone();

        a.update(2.0);

        assert_eq!(b.id(), TargetId(7));
        assert!((b.state().position.x - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_missile_phase_terminated_only() {
        assert!(!MissilePhase::default().is_terminated());
        assert!(!MissilePhase::Midcourse.is_terminated());
        assert!(!MissilePhase::Terminal.is_terminated());
        assert!(MissilePhase::Terminated.is_terminated());
        assert_eq!(ClusterStatus::default(), ClusterStatus::Active);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        time.advance(0.25);
        time.advance(0.5);
        assert_eq!(time.frame, 2);
        assert!((time.elapsed_secs - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_event_tagged_json() {
        let event = SimEvent::ClusterTerminated {
            cluster: ClusterId(3),
            cause: TerminationCause::Commanded,
            time_since_launch: 1.5,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"ClusterTerminated\""), "{json}");

        let back: SimEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_snapshot_live_missile_total() {
        let view = |id: u32, live: usize| ClusterView {
            id: ClusterId(id),
            target: TargetId(0),
            status: ClusterStatus::Active,
            steps: 0,
            step_accumulator: 0.0,
            time_since_launch: 0.0,
            time_to_hit: 1.0,
            live_missiles: live,
            missiles: vec![MissileView {
                index: 0,
                phase: MissilePhase::Boost,
                position: DVec3::ZERO,
            }],
        };
        let snapshot = RegistrySnapshot {
            clusters: vec![view(0, 3), view(1, 2)],
            ..Default::default()
        };
        assert_eq!(snapshot.live_missiles(), 5);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: RegistrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_error_messages_and_staleness() {
        let err = SimError::UnknownMissile(MissileHandle::new(ClusterId(2), 5));
        assert_eq!(err.to_string(), "unknown missile C2#5");
        assert!(err.is_stale_handle());

        let err = SimError::InvalidSimulationStep(0.0);
        assert!(!err.is_stale_handle());

        let parse = serde_json::from_str::<SimTime>("not json").unwrap_err();
        assert!(matches!(SimError::from(parse), SimError::Config(_)));
    }
}
