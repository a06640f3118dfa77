//! Row source error types.

/// Failure reported by a row source while fetching a compiled view.
#[derive(Debug, Clone)]
pub struct SourceError {
    /// Name of the connection the fetch was sent to
    pub connection: String,
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl SourceError {
    /// Create a new SourceError for a connection at the current location.
    #[track_caller]
    pub fn new(connection: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            connection: connection.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Source Error on '{}': {} at line {} in {}",
            self.connection, self.message, self.line, self.file
        )
    }
}

impl std::error::Error for SourceError {}
