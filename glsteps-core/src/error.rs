/// Error types for matrix construction and inversion
use thiserror::Error;

/// Failures surfaced by the transform operations instead of NaN or infinities
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// A projection or conversion parameter is outside its domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Look-at inputs cannot span an orthonormal frame
    #[error("Degenerate basis: {0}")]
    DegenerateBasis(String),

    /// The matrix has no inverse
    #[error("Singular matrix: determinant {determinant:e} is below tolerance")]
    SingularMatrix { determinant: f32 },
}

impl TransformError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn degenerate_basis(message: impl Into<String>) -> Self {
        Self::DegenerateBasis(message.into())
    }
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
