//! View compiler for Quarry.
//!
//! Turns a declarative [`View`](quarry_core::View) plus runtime parameters into
//! a parameterized SQL statement for the dialect of the view's connection:
//!
//! 1. resolve the connection and its dialect
//! 2. apply the dialect's override (typed merge, inputs untouched)
//! 3. render select list, joins, WHERE/HAVING with positional binds,
//!    GROUP BY, ORDER BY and the dialect's limit syntax
//!
//! Compilation is a pure function of the catalog, the view and the parameters.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod compiler;
mod expressions;
mod merge;

pub use compiler::{CompiledView, ViewCompiler};
pub use expressions::{format_positional, render_expression};
pub use merge::{apply_override, merge_filters, merge_select};
