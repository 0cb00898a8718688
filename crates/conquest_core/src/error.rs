//! Error types for the planning core.
//!
//! Only data-integrity faults are errors. Infeasible plans (no path, nothing
//! affordable) are ordinary outcomes and are reported through `Option` or an
//! empty result instead.

use thiserror::Error;

use crate::map::TerritoryId;

/// Result type alias using [`PlannerError`].
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Top-level error type for all planning errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    /// A territory id resolved to no continent.
    #[error("Data integrity: territory {0} belongs to no continent")]
    UnknownContinent(TerritoryId),

    /// A territory id is missing from the snapshot.
    #[error("Data integrity: territory {0} not present in snapshot")]
    UnknownTerritory(TerritoryId),

    /// A committed cluster has no owned territory next to it.
    #[error("Planning fault: cluster {cluster_id} has no reachable attacker")]
    MissingAttacker {
        /// Sequence id of the offending cluster.
        cluster_id: u32,
    },

    /// A decision had no legal candidate to choose from.
    #[error("No candidate available for {0}")]
    NoCandidate(&'static str),

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
