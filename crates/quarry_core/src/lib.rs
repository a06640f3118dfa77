//! Core data types for Quarry.
//!
//! This crate holds the declarative model shared by the compiler, the result
//! cache and the column filter engine: views and their parts, per-dialect
//! overrides, the catalog of connections/dialects/expressions, scalar values
//! and fetched result sets.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalog;
mod filter;
mod overrides;
mod result;
mod select;
mod value;
mod view;

pub use catalog::{
    Catalog, CatalogExpression, ConnectionConfig, ConnectionOptions, DialectConfig, LimitConfig,
    LimitStyle,
};
pub use filter::{Clause, Filter, FilterDefault, FilterPatch};
pub use overrides::{Override, SelectMode};
pub use result::ResultSet;
pub use select::{SelectItem, SelectKind, SelectSpec};
pub use value::{RuntimeParams, ScalarValue, tuple_repr};
pub use view::{FromItem, Join, Limit, View, ViewSet};
