//! Row source trait.

use async_trait::async_trait;
use quarry_compiler::CompiledView;
use quarry_core::ResultSet;
use quarry_error::SourceError;

/// Something that can execute a compiled view and return its rows.
///
/// Implementations own the transport (ODBC, a driver pool, a test double).
/// The statement's `connection` names the configured connection to use and
/// `binds` line up with the `?` placeholders in `sql`.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Execute the statement and collect its rows.
    ///
    /// # Errors
    ///
    /// Returns error if the statement cannot be executed.
    async fn fetch(&self, compiled: &CompiledView) -> Result<ResultSet, SourceError>;
}
