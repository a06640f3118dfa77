//! Filter expression compilation and evaluation.

use crate::{looks_like_date, parse_datetime, parse_number};
use chrono::NaiveDateTime;
use quarry_core::ScalarValue;
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Comparison operator of a typed filter rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum CompareOp {
    /// `=` or `==`
    #[strum(to_string = "=", serialize = "==")]
    Eq,
    /// `!=`
    #[strum(serialize = "!=")]
    Ne,
    /// `<`
    #[strum(serialize = "<")]
    Lt,
    /// `<=`
    #[strum(serialize = "<=")]
    Le,
    /// `>`
    #[strum(serialize = ">")]
    Gt,
    /// `>=`
    #[strum(serialize = ">=")]
    Ge,
}

impl CompareOp {
    /// Compare `value` against `threshold`.
    pub fn apply<T: PartialOrd>(self, value: &T, threshold: &T) -> bool {
        match self {
            CompareOp::Eq => value == threshold,
            CompareOp::Ne => value != threshold,
            CompareOp::Lt => value < threshold,
            CompareOp::Le => value <= threshold,
            CompareOp::Gt => value > threshold,
            CompareOp::Ge => value >= threshold,
        }
    }
}

/// Case-insensitive regex rule.
///
/// A pattern that fails to compile is kept for display but matches nothing.
#[derive(Debug, Clone)]
pub struct RegexRule {
    pattern: String,
    regex: Option<Regex>,
}

impl RegexRule {
    /// Compile a pattern case-insensitively.
    pub fn new(pattern: &str) -> Self {
        let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!(pattern, error = %e, "Invalid filter regex, rule matches nothing");
                None
            }
        };
        Self {
            pattern: pattern.to_string(),
            regex,
        }
    }

    /// Pattern as written.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the pattern compiled.
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    /// Whether the pattern is found anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(text))
    }
}

impl PartialEq for RegexRule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

/// Compiled column filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterRule {
    /// Case-insensitive substring; the needle is stored lowercased
    Substring(String),
    /// Case-insensitive regex, found anywhere
    Regex(RegexRule),
    /// Numeric comparison against a threshold
    NumCompare {
        /// Operator
        op: CompareOp,
        /// Right-hand side
        threshold: f64,
    },
    /// Inclusive numeric range, `low <= high`
    NumRange {
        /// Lower bound
        low: f64,
        /// Upper bound
        high: f64,
    },
    /// Date/time comparison against a threshold
    DateCompare {
        /// Operator
        op: CompareOp,
        /// Right-hand side
        threshold: NaiveDateTime,
    },
    /// Inclusive date/time range, `low <= high`
    DateRange {
        /// Lower bound
        low: NaiveDateTime,
        /// Upper bound
        high: NaiveDateTime,
    },
}

impl FilterRule {
    /// Substring rule for `needle`, matched case-insensitively.
    pub fn substring(needle: &str) -> Self {
        FilterRule::Substring(needle.to_lowercase())
    }

    /// Whether a cell's display text satisfies the rule.
    ///
    /// Typed rules never match text that does not parse as their type.
    pub fn matches(&self, cell: &str) -> bool {
        match self {
            FilterRule::Substring(needle) => cell.to_lowercase().contains(needle.as_str()),
            FilterRule::Regex(rule) => rule.is_match(cell),
            FilterRule::NumCompare { op, threshold } => {
                parse_number(cell).is_some_and(|v| op.apply(&v, threshold))
            }
            FilterRule::NumRange { low, high } => {
                parse_number(cell).is_some_and(|v| *low <= v && v <= *high)
            }
            FilterRule::DateCompare { op, threshold } => {
                parse_datetime(cell).is_some_and(|v| op.apply(&v, threshold))
            }
            FilterRule::DateRange { low, high } => {
                parse_datetime(cell).is_some_and(|v| *low <= v && v <= *high)
            }
        }
    }

    /// Whether a cell value satisfies the rule; null is the empty string.
    pub fn matches_value(&self, value: &ScalarValue) -> bool {
        self.matches(&value.to_string())
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterRule::Substring(needle) => write!(f, "contains {:?}", needle),
            FilterRule::Regex(rule) if rule.is_valid() => write!(f, "regex /{}/i", rule.pattern()),
            FilterRule::Regex(rule) => write!(f, "invalid regex /{}/", rule.pattern()),
            FilterRule::NumCompare { op, threshold } => write!(f, "number {} {}", op, threshold),
            FilterRule::NumRange { low, high } => write!(f, "number in [{}, {}]", low, high),
            FilterRule::DateCompare { op, threshold } => write!(f, "date {} {}", op, threshold),
            FilterRule::DateRange { low, high } => write!(f, "date in [{}, {}]", low, high),
        }
    }
}

fn comparison_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(<=|>=|<|>|==|=|!=)\s*(.+?)\s*$").expect("valid comparison regex")
    })
}

fn numeric_range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(-?\d[\d,]*(?:\.\d+)?)\s*\.\.\s*(-?\d[\d,]*(?:\.\d+)?)\s*$")
            .expect("valid numeric range regex")
    })
}

fn range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(.+?)\s*\.\.\s*(.+?)\s*$").expect("valid range regex"))
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}

fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if b < a { (b, a) } else { (a, b) }
}

/// Compile a filter expression; `None` means "no filter".
///
/// Forms are tried in order: empty, `re:` regex, optional `date:`/`dt:`
/// prefix, comparison (`<= >= < > == = !=`), numeric range `a..b`, date
/// range `a..b`, and finally a case-insensitive substring. A comparison whose
/// operand parses as neither date nor number becomes a substring rule over
/// the whole expression, operator included.
pub fn compile(expression: &str) -> Option<FilterRule> {
    let text = expression.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(pattern) = strip_prefix_ignore_case(text, "re:") {
        return Some(FilterRule::Regex(RegexRule::new(pattern)));
    }

    let (force_date, text) = match strip_prefix_ignore_case(text, "date:")
        .or_else(|| strip_prefix_ignore_case(text, "dt:"))
    {
        Some(rest) => (true, rest.trim()),
        None => (false, text),
    };

    let rule = compile_typed(text, force_date).unwrap_or_else(|| FilterRule::substring(text));
    debug!(expression, rule = %rule, "Compiled column filter");
    Some(rule)
}

fn compile_typed(text: &str, force_date: bool) -> Option<FilterRule> {
    if let Some(caps) = comparison_regex().captures(text) {
        let op: CompareOp = caps[1].parse().ok()?;
        let operand = &caps[2];
        if force_date || looks_like_date(operand) {
            if let Some(threshold) = parse_datetime(operand) {
                return Some(FilterRule::DateCompare { op, threshold });
            }
        }
        return parse_number(operand).map(|threshold| FilterRule::NumCompare { op, threshold });
    }

    if let Some(caps) = numeric_range_regex().captures(text) {
        if let (Some(a), Some(b)) = (parse_number(&caps[1]), parse_number(&caps[2])) {
            let (low, high) = ordered(a, b);
            return Some(FilterRule::NumRange { low, high });
        }
    }

    if let Some(caps) = range_regex().captures(text) {
        let (a, b) = (&caps[1], &caps[2]);
        if force_date || looks_like_date(a) || looks_like_date(b) {
            if let (Some(a), Some(b)) = (parse_datetime(a), parse_datetime(b)) {
                let (low, high) = ordered(a, b);
                return Some(FilterRule::DateRange { low, high });
            }
        }
    }

    None
}
