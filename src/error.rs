//! Error taxonomy for the tiled labeling pipeline.
//!
//! The three kinds mirror the failure semantics described for the pipeline:
//! parameter errors (invalid tile/raster geometry), invariant violations
//! (a bug in the cross-tile stitching stages), and resource errors
//! (allocation failure for a per-tile buffer).

use thiserror::Error;

/// The pipeline stage that detected a failure, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// C2: intra-tile first scan.
    FirstScan,
    /// C3/C4: intra-tile union and relabel.
    Union,
    /// C6: cross-equivalence builder.
    CrossBuild,
    /// C7: cross-tile union (closure to a forest of roots).
    CrossUnion,
    /// C8: cross-tile relabel (dense global IDs).
    CrossRelabel,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::FirstScan => "first scan (C2)",
            Stage::Union => "intra-tile union/relabel (C3/C4)",
            Stage::CrossBuild => "cross-equivalence builder (C6)",
            Stage::CrossUnion => "cross-tile union (C7)",
            Stage::CrossRelabel => "cross-tile relabel (C8)",
        };
        f.write_str(name)
    }
}

/// Errors produced by the tiled connected-component labeling pipeline.
#[derive(Debug, Error)]
pub enum CclError {
    /// The tile or raster geometry is out of range (`TX < 2`, `TY < 2`, a
    /// zero dimension, or a raster whose shape doesn't match the tile
    /// geometry it was paired with).
    #[error("invalid geometry: {detail}")]
    InvalidGeometry {
        /// Human-readable explanation of which constraint failed.
        detail: String,
    },

    /// A cross-tile stitching stage could not find a predecessor it was
    /// guaranteed to find by the invariants of the previous stage. This
    /// indicates a bug in C6 or C7, not a data problem; the pipeline
    /// aborts rather than emitting a partial result.
    #[error("invariant violated in {stage}: {detail}")]
    InvariantViolation {
        /// Stage that detected the violation.
        stage: Stage,
        /// Human-readable explanation.
        detail: String,
    },

    /// A per-tile or global buffer could not be allocated.
    #[error("allocation failed: {0}")]
    Allocation(String),
}
