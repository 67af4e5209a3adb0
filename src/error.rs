use thiserror::Error;

/// Error types for the voigt-rs library.
#[derive(Error, Debug)]
pub enum VoigtError {
    /// Error for an invalid or unknown parameterization choice.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error indicating a mismatch in array dimensions.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Error for parameter-related problems.
    #[error("Parameter error: {0}")]
    ParameterError(String),

    /// Parameter not found.
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A deferred chunk could not be computed.
    #[error("Materialization error: {0}")]
    Materialization(String),

    /// A saved model in the older layout could not be understood.
    #[error("Legacy format error: {0}")]
    LegacyFormat(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<crate::parameters::parameter::ParameterError> for VoigtError {
    fn from(err: crate::parameters::parameter::ParameterError) -> Self {
        VoigtError::ParameterError(format!("{}", err))
    }
}

impl From<crate::parameters::bounds::BoundsError> for VoigtError {
    fn from(err: crate::parameters::bounds::BoundsError) -> Self {
        VoigtError::ParameterError(format!("{}", err))
    }
}

impl From<crate::parameters::parameters::SerializationError> for VoigtError {
    fn from(err: crate::parameters::parameters::SerializationError) -> Self {
        use crate::parameters::parameters::SerializationError;
        match err {
            SerializationError::IoError(e) => VoigtError::IoError(e),
            SerializationError::JsonError(e) => VoigtError::JsonError(e),
        }
    }
}

/// Result type alias for voigt-rs operations.
pub type Result<T> = std::result::Result<T, VoigtError>;
