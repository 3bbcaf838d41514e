//! Error types for ring preparation.
//!
//! These are internal-consistency failures with no sensible geometric result.
//! Recoverable outcomes are reported as values instead: see
//! [`PolygonError`](crate::polygon::PolygonError) and
//! [`PolyUnionError`](crate::polygon::PolyUnionError).

use thiserror::Error;

/// Fatal errors raised while splitting or combining rings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// An operation needs a ring with at least three vertices.
    #[error("ring has {len} vertices, at least 3 are required")]
    NotEnoughVertices {
        /// Number of vertices the ring actually had.
        len: usize,
    },

    /// Merging coincident split-graph nodes left fewer than three of them.
    #[error("split graph collapsed to {active} active nodes")]
    GraphCollapsed {
        /// Nodes still active when the collapse was aborted.
        active: usize,
    },

    /// The boundary trace over the split graph never returned to its start.
    #[error("boundary trace did not close after {steps} steps")]
    TraceDidNotClose {
        /// Steps taken before giving up.
        steps: usize,
    },

    /// Inserting crossing nodes did not reach a fixed point.
    #[error("intersection pass did not converge after {iterations} iterations")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            GeometryError::GraphCollapsed { active: 2 }.to_string(),
            "split graph collapsed to 2 active nodes"
        );
        assert_eq!(
            GeometryError::NotEnoughVertices { len: 1 }.to_string(),
            "ring has 1 vertices, at least 3 are required"
        );
    }
}
