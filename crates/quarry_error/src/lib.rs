//! Error types for the Quarry workspace.
//!
//! Every error records the source location where it was created, so a failure
//! surfaced from deep inside the compiler still points at the code that raised it.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod source;
mod view;

pub use config::ConfigError;
pub use error::{QuarryError, QuarryErrorKind, QuarryResult};
pub use source::SourceError;
pub use view::{ViewError, ViewErrorKind, ViewResult};
