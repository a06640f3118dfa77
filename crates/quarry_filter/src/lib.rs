//! Column filter expressions for Quarry result sets.
//!
//! A filter expression typed against a column compiles into a [`FilterRule`]:
//!
//! | expression            | rule                                   |
//! |-----------------------|----------------------------------------|
//! | `smith`               | case-insensitive substring             |
//! | `re:^A\d+`            | case-insensitive regex, found anywhere |
//! | `>= 1,000`            | numeric comparison                     |
//! | `100..200`            | inclusive numeric range                |
//! | `< 2024-01-01`        | date/time comparison                   |
//! | `dt:1/2/2024..3/2/2024` | date prefix forces date parsing      |
//!
//! ```
//! use quarry_filter::compile;
//!
//! let rule = compile("100..200").unwrap();
//! assert!(rule.matches("150"));
//! assert!(!rule.matches("250"));
//! assert!(compile("   ").is_none());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod columns;
mod parse;
mod rule;

pub use columns::ColumnFilters;
pub use parse::{looks_like_date, parse_datetime, parse_number};
pub use rule::{CompareOp, FilterRule, RegexRule, compile};
