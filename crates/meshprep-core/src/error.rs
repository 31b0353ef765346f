//! Error types for meshprep.

use thiserror::Error;

/// The main error type for meshprep operations.
#[derive(Error, Debug)]
pub enum MeshPrepError {
    /// No point or cell array with the given name exists on the dataset.
    #[error("array '{0}' not found on dataset")]
    ArrayNotFound(String),

    /// A named opacity array does not line up with the scalars it modulates.
    #[error(
        "opacity array and scalars array must have the same number of elements \
         (opacity: {opacity}, scalars: {scalars})"
    )]
    OpacityShapeMismatch { opacity: usize, scalars: usize },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// An index array refers past the end of the array being re-indexed.
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The named opacity transfer function does not exist.
    #[error("opacity transfer function '{name}' unknown, valid options: {}", valid.join(", "))]
    UnknownTransferFunction { name: String, valid: Vec<String> },

    /// A transfer function was given more control points than colors.
    #[error(
        "transfer function cannot have more values than n_colors ({n_colors}), \
         this has {len} elements"
    )]
    TransferFunctionTooLong { len: usize, n_colors: usize },

    /// A transfer function was given no control points.
    #[error("transfer function has no control points")]
    EmptyTransferFunction,

    /// A field association string was not understood.
    #[error("invalid field association '{0}', expected 'point' or 'cell'")]
    InvalidFieldAssociation(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for meshprep operations.
pub type Result<T> = std::result::Result<T, MeshPrepError>;
