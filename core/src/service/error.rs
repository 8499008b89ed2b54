use thiserror::Error;

use crate::parameter::ParameterError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Service '{0}' has been closed")]
    Closed(String),

    #[error("Parameter error: {0}")]
    Parameters(#[from] ParameterError),
}
