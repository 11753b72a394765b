use thiserror::Error;

use crate::graph::GlenId;

/// Violations of the graph's structural invariants. Raised at
/// construction/generation time and never recoverable mid-run.
#[derive(Debug, Error)]
pub enum StructuralError {
    #[error("path would loop glen '{0}' back onto itself")]
    SelfLoop(String),

    #[error("glens '{0}' and '{1}' are already linked")]
    DuplicatePath(String, String),

    #[error("glen handle {0:?} does not belong to this county")]
    ForeignGlen(GlenId),
}

/// A movement strategy could not produce a destination. Aborts only the
/// offending flock's move for the current tick.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("flock '{0}' has no outgoing paths to choose from")]
    NoOutgoingPaths(String),

    #[error("strategy '{strategy}' failed for flock '{flock}': {reason}")]
    Failed {
        strategy: String,
        flock: String,
        reason: String,
    },
}

/// Generator parameters that would produce a degenerate county.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("lattice width must be at least 1, got {0}")]
    InvalidWidth(u32),

    #[error("connectivity must lie in [0, 1], got {0}")]
    InvalidConnectivity(f64),

    #[error("an arbitrary county needs at least one glen")]
    EmptyCounty,

    #[error("flock size range is inverted: min {min} > max {max}")]
    FlockSizeRange { min: usize, max: usize },

    #[error("unknown movement strategy '{0}'")]
    UnknownStrategy(String),

    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        value: i64,
        min: i64,
    },

    #[error("{field} {value} exceeds the county ceiling {max}")]
    AboveCeiling {
        field: &'static str,
        value: i64,
        max: i64,
    },
}

#[derive(Debug, Error)]
pub enum CountyError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
