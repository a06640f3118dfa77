//! Errors raised while compiling a view into SQL.

/// Reasons a view cannot be compiled.
///
/// All of them are deterministic input-validation failures: compiling the same
/// view against the same catalog always fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ViewErrorKind {
    /// Connection name matches no configured connection.
    #[display("Unknown connection: {_0}")]
    UnknownConnection(String),
    /// Dialect has no entry in the dialect table.
    #[display("Unknown dialect: {_0}")]
    UnknownDialect(String),
    /// Catalog expression reference, or its template for the active dialect, is missing.
    #[display("Unknown catalog expression '{reference}' for dialect '{dialect}'")]
    UnknownExpression {
        /// Expression reference name
        reference: String,
        /// Active dialect
        dialect: String,
    },
    /// Catalog template has a placeholder with no matching argument.
    #[display("Catalog expression '{reference}' has an invalid template: {reason}")]
    InvalidTemplate {
        /// Expression reference name
        reference: String,
        /// What went wrong
        reason: String,
    },
    /// Aggregate select item without arguments.
    #[display("Aggregate select item '{_0}' requires 'args'")]
    MissingArguments(String),
    /// Select item with an unrecognized `kind`.
    #[display("Unknown select kind: {_0}")]
    UnknownSelectKind(String),
    /// Select item missing a field its kind requires.
    #[display("Select item '{alias}' is missing required field '{field}'")]
    InvalidSelectItem {
        /// Alias of the item, or `?` when absent
        alias: String,
        /// Missing field name
        field: &'static str,
    },
    /// Filter appended by an override has no condition.
    #[display("Filter '{_0}' has no 'where' condition")]
    InvalidFilter(String),
    /// View has no from-items.
    #[display("View '{_0}' has an empty 'from' list")]
    EmptyFrom(String),
    /// Joined from-item without a join condition.
    #[display("Joined table '{_0}' has no join condition")]
    MissingJoin(String),
}

/// View compilation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("View Error: {} at line {} in {}", kind, line, file)]
pub struct ViewError {
    kind: ViewErrorKind,
    line: u32,
    file: &'static str,
}

impl ViewError {
    /// Create a new view error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ViewErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ViewErrorKind {
        &self.kind
    }
}

impl<T> From<T> for ViewError
where
    T: Into<ViewErrorKind>,
{
    #[track_caller]
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for view compilation.
pub type ViewResult<T> = std::result::Result<T, ViewError>;
