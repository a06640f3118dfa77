//! Quarry: parameterized SQL views over heterogeneous backends.
//!
//! Views are declared once (select items, joins, filters, grouping, ordering,
//! limits) and rendered per connection dialect, with per-dialect overrides.
//! Fetched rows are cached by a fingerprint of the rendered statement and can
//! be narrowed with per-column filter expressions.
//!
//! This crate re-exports the engines and adds the glue between them:
//!
//! - [`Settings`]: file locations and cache size, from TOML
//! - [`RowSource`]: the seam to whatever actually executes SQL
//! - [`ViewSession`]: compile, fingerprint, serve from cache or fetch
//!
//! ```no_run
//! use async_trait::async_trait;
//! use quarry::{CompiledView, ResultSet, RowSource, RuntimeParams, Settings, SourceError, ViewSession};
//!
//! struct Odbc;
//!
//! #[async_trait]
//! impl RowSource for Odbc {
//!     async fn fetch(&self, compiled: &CompiledView) -> Result<ResultSet, SourceError> {
//!         Err(SourceError::new(compiled.connection().as_str(), "not connected"))
//!     }
//! }
//!
//! # async fn demo() -> quarry::QuarryResult<()> {
//! let session = ViewSession::from_settings(&Settings::default())?;
//! let outcome = session.run("people", &RuntimeParams::new(), &Odbc).await?;
//! println!("{} rows", outcome.result().row_count());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod params;
mod session;
mod settings;
mod source;

pub use params::{params_from_pairs, parse_param};
pub use session::{RunOutcome, ViewSession};
pub use settings::{Settings, SettingsBuilder, SettingsBuilderError};
pub use source::RowSource;

pub use quarry_cache::{CacheStats, Fingerprint, LruStore, ResultCache};
pub use quarry_compiler::{CompiledView, ViewCompiler};
pub use quarry_core::{
    Catalog, ConnectionConfig, Filter, FilterDefault, Override, ResultSet, RuntimeParams,
    ScalarValue, SelectItem, SelectSpec, View, ViewSet,
};
pub use quarry_error::{
    ConfigError, QuarryError, QuarryErrorKind, QuarryResult, SourceError, ViewError,
    ViewErrorKind,
};
pub use quarry_filter::{ColumnFilters, FilterRule};
