use super::Error;

/// Error when an entity's declared mapping cannot serve a request.
///
/// This occurs when:
/// - A column name passed to a by-column lookup is not mapped
/// - Two fields map to the same column name
/// - A field claims the reserved identity column
#[derive(Debug)]
pub(super) struct SchemaMappingError {
    message: Box<str>,
}

impl std::error::Error for SchemaMappingError {}

impl core::fmt::Display for SchemaMappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "schema mapping error: {}", self.message)
    }
}

impl Error {
    /// Creates a schema mapping error.
    pub fn schema_mapping(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::SchemaMapping(SchemaMappingError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a schema mapping error.
    pub fn is_schema_mapping(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::SchemaMapping(_)))
    }
}
