use thiserror::Error;

/// Errors reported at the boundaries of the simulation engine. All inputs are
/// validated up front; once a request has been rejected no partial results are
/// returned.
#[derive(Debug, Error)]
pub enum CoolsimError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid cooling configuration: {0}")]
    ConfigurationError(String),
}

pub(crate) fn invalid_input(message: impl Into<String>) -> CoolsimError {
    CoolsimError::InvalidInput(message.into())
}

pub(crate) fn configuration_error(message: impl Into<String>) -> CoolsimError {
    CoolsimError::ConfigurationError(message.into())
}
