//! Error types for physics operations.
//!
//! Only construction and configuration can fail. Degenerate states met while
//! solving (zero-mass constraints, collapsed edges, flat tetrahedra) are
//! skipped, never reported.

use thiserror::Error;

/// Errors that can occur while building or configuring a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A flat mesh buffer has a length that is not a multiple of its stride.
    #[error("{buffer} buffer has {len} entries, not a multiple of {stride}")]
    InvalidMeshLayout {
        buffer: &'static str,
        len: usize,
        stride: usize,
    },
    /// A topology entry references a vertex that does not exist.
    #[error("{buffer} entry {position} references vertex {index} (vertex count: {count})")]
    IndexOutOfBounds {
        buffer: &'static str,
        position: usize,
        index: usize,
        count: usize,
    },
    /// A vertex coordinate is NaN or infinite.
    #[error("vertex {vertex} has a non-finite coordinate")]
    NonFiniteCoordinate { vertex: usize },
    /// Inverse mass must be finite and non-negative.
    #[error("inverse mass must be finite and non-negative")]
    InvalidMass,
    /// Particle index is out of bounds.
    #[error("particle index {index} out of bounds (count: {count})")]
    ParticleOutOfBounds { index: usize, count: usize },
    /// Time steps must be positive and finite.
    #[error("time step must be positive and finite")]
    InvalidTimestep,
    /// Compliance must be finite and non-negative.
    #[error("compliance must be finite and non-negative")]
    InvalidCompliance,
}

/// Convenience alias for `Result<T, PhysicsError>`.
pub type PhysicsResult<T> = Result<T, PhysicsError>;
