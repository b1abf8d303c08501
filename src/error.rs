use thiserror::Error;

use crate::topology::{EdgeId, FaceId};

/// Top-level error type for the knotwork crate.
#[derive(Debug, Error)]
pub enum KnotworkError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("degenerate geometry at edge {edge:?} of face {face:?}: {reason}")]
    DegenerateEdge {
        face: FaceId,
        edge: EdgeId,
        reason: &'static str,
    },
}

/// Errors related to mesh topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("edge {edge:?} is shared by {face_count} faces; at most 2 are supported")]
    NonManifoldEdge { edge: EdgeId, face_count: usize },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to mesh operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("no active mesh object with geometry is selected")]
    NoActiveSelection,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`KnotworkError`].
pub type Result<T> = std::result::Result<T, KnotworkError>;
