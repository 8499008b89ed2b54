use thiserror::Error;

use super::ParameterType;

#[derive(Error, Debug)]
pub enum ParameterError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Parameter '{name}' expects a {expected} value, got {found}")]
    TypeMismatch {
        name: String,
        expected: ParameterType,
        found: String,
    },

    #[error("Missing value for required parameter '{0}'")]
    MissingValue(String),

    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("Parameter '{0}' is already defined")]
    Duplicate(String),
}
