use super::Error;

/// Error when the process-wide connection provisioning is misconfigured.
///
/// This occurs when:
/// - The shared connection is requested before a driver was installed
/// - A driver is installed a second time
/// - A connection URL cannot be understood by the driver
#[derive(Debug)]
pub(super) struct ConfigurationError {
    message: Box<str>,
}

impl std::error::Error for ConfigurationError {}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "connection configuration error: {}", self.message)
    }
}

impl Error {
    /// Creates a connection configuration error.
    pub fn configuration(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Configuration(ConfigurationError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a configuration error.
    pub fn is_configuration(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::Configuration(_)))
    }
}
