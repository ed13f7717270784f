//! Error types for configuration and registry lookups.

use thiserror::Error;

use crate::types::{ClusterId, MissileHandle};

/// Errors surfaced by the simulation crates.
///
/// Stepping never fails; these only come out of configuration and
/// handle-based lookups.
#[derive(Debug, Error)]
pub enum SimError {
    /// Integration step must be finite and strictly positive.
    #[error("invalid simulation step: {0}")]
    InvalidSimulationStep(f64),

    /// Target cadence must be finite and strictly positive.
    #[error("invalid target update interval: {0}")]
    InvalidTargetInterval(f64),

    /// Time scale must be finite and non-negative.
    #[error("invalid time scale: {0}")]
    InvalidTimeScale(f64),

    /// Spawn distance scale must be finite and non-negative.
    #[error("invalid spawn distance scale: {0}")]
    InvalidDistanceScale(f64),

    /// Cluster was never launched or has already been swept.
    #[error("unknown cluster {0}")]
    UnknownCluster(ClusterId),

    /// Missile index is outside its cluster's array.
    #[error("unknown missile {0}")]
    UnknownMissile(MissileHandle),

    /// Configuration document could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl SimError {
    /// True for the lookup errors a host can treat as "already gone".
    pub fn is_stale_handle(&self) -> bool {
        matches!(self, Self::UnknownCluster(_) | Self::UnknownMissile(_))
    }
}
