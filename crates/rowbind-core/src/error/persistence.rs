use super::Error;

/// Error when a write could not be carried out as mapped.
///
/// This occurs when:
/// - Positional binds do not line up with the prepared statement
/// - A shared connection lock was poisoned by a panicking caller
/// - The driver returned a response of the wrong shape
#[derive(Debug)]
pub(super) struct PersistenceError {
    message: Box<str>,
}

impl std::error::Error for PersistenceError {}

impl core::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "persistence failure: {}", self.message)
    }
}

impl Error {
    /// Creates a persistence error.
    pub fn persistence(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Persistence(PersistenceError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a persistence error or a driver
    /// operation failure.
    pub fn is_persistence(&self) -> bool {
        self.any_kind(|kind| {
            matches!(
                kind,
                super::ErrorKind::Persistence(_) | super::ErrorKind::DriverOperationFailed(_)
            )
        })
    }
}
