//! Lifecycle events emitted by the registry for host feedback.

use serde::{Deserialize, Serialize};

use crate::enums::TerminationCause;
use crate::types::{ClusterId, TargetId};

/// Registry lifecycle events, buffered until the host drains them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A cluster was constructed and appended to the live set.
    ClusterLaunched {
        cluster: ClusterId,
        target: TargetId,
        missiles: usize,
    },
    /// The spawn generator ran dry before every slot had a candidate.
    SpawnShortfall {
        cluster: ClusterId,
        requested: usize,
        placed: usize,
    },
    /// A cluster went `Active -> Terminated`.
    ClusterTerminated {
        cluster: ClusterId,
        cause: TerminationCause,
        time_since_launch: f64,
    },
    /// A terminated cluster left the live set.
    ClusterRemoved { cluster: ClusterId },
}
