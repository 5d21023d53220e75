//! Error types for table construction and painting.

use thiserror::Error;

/// Why a single raw color-stop record was rejected.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum StopFault {
    #[error("record is not a key/value map")]
    NotARecord,

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' is not a number")]
    NotNumeric(&'static str),
}

/// A raw color-stop record failed validation; no table was built.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
#[error("malformed color stop #{index}: {fault}")]
pub struct MalformedColorStop {
    /// Position of the offending record in the caller's input.
    pub index: usize,
    pub fault: StopFault,
}

/// Gradient parameters rejected before any allocation or pixel work.
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{name} must not be negative (got {value})")]
    NegativeDimension { name: &'static str, value: i32 },

    #[error("direction vector must not be the null vector")]
    NullDirection,

    #[error("direction vector must be finite")]
    NonFiniteDirection,

    #[error("at least 2 color stops are required (got {count})")]
    InsufficientStops { count: usize },

    #[error("pixel buffer of {width}x{height} does not fit in memory")]
    BufferTooLarge { width: u64, height: u64 },
}

/// Either failure of the build → paint pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum GradientError {
    #[error(transparent)]
    Malformed(#[from] MalformedColorStop),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
