//! Catalog expression rendering.

use quarry_core::Catalog;
use quarry_error::{ViewError, ViewErrorKind, ViewResult};

/// Render a catalog expression for a dialect.
///
/// # Errors
///
/// - `UnknownExpression` when the reference or its template for `dialect` is missing
/// - `InvalidTemplate` when the template does not fit the static arguments
pub fn render_expression(catalog: &Catalog, reference: &str, dialect: &str) -> ViewResult<String> {
    let unknown = || {
        ViewError::new(ViewErrorKind::UnknownExpression {
            reference: reference.to_string(),
            dialect: dialect.to_string(),
        })
    };
    let expression = catalog.expression(reference).ok_or_else(unknown)?;
    let template = expression.template_for(dialect).ok_or_else(unknown)?;

    format_positional(template, expression.args()).map_err(|reason| {
        ViewError::new(ViewErrorKind::InvalidTemplate {
            reference: reference.to_string(),
            reason,
        })
    })
}

/// Substitute positional arguments into a template.
///
/// Supports automatic `{}` and explicit `{0}` fields (not mixed) and the
/// `{{` / `}}` escapes.
///
/// ```
/// use quarry_compiler::format_positional;
///
/// let args = vec!["created_at".to_string(), "day".to_string()];
/// assert_eq!(
///     format_positional("DATE_TRUNC('{1}', {0})", &args).unwrap(),
///     "DATE_TRUNC('day', created_at)"
/// );
/// assert_eq!(format_positional("{{{}}}", &args).unwrap(), "{created_at}");
/// ```
///
/// # Errors
///
/// Returns a description of the problem when a field is malformed or refers
/// to a missing argument.
pub fn format_positional(template: &str, args: &[String]) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_auto = 0usize;
    let mut numbering: Option<bool> = None; // Some(true) = automatic

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => field.push(ch),
                        None => return Err("unterminated '{' in template".to_string()),
                    }
                }

                let automatic = field.is_empty();
                if *numbering.get_or_insert(automatic) != automatic {
                    return Err("cannot mix automatic and explicit field numbering".to_string());
                }

                let index = if automatic {
                    next_auto += 1;
                    next_auto - 1
                } else {
                    field
                        .parse::<usize>()
                        .map_err(|_| format!("unsupported field '{{{}}}'", field))?
                };

                let arg = args.get(index).ok_or_else(|| {
                    format!(
                        "field {} has no argument ({} given)",
                        index,
                        args.len()
                    )
                })?;
                out.push_str(arg);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err("single '}' in template".to_string()),
            _ => out.push(c),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_automatic_fields() {
        assert_eq!(
            format_positional("COALESCE({}, {})", &args(&["a", "b"])).unwrap(),
            "COALESCE(a, b)"
        );
    }

    #[test]
    fn test_explicit_fields_may_repeat() {
        assert_eq!(
            format_positional("{0} || {0}", &args(&["x"])).unwrap(),
            "x || x"
        );
    }

    #[test]
    fn test_template_without_fields() {
        assert_eq!(format_positional("GETDATE()", &[]).unwrap(), "GETDATE()");
    }

    #[test]
    fn test_missing_argument() {
        let err = format_positional("{} + {}", &args(&["a"])).unwrap_err();
        assert!(err.contains("field 1"));
    }

    #[test]
    fn test_mixed_numbering_rejected() {
        assert!(format_positional("{} {0}", &args(&["a"])).is_err());
    }

    #[test]
    fn test_unbalanced_braces_rejected() {
        assert!(format_positional("{0", &args(&["a"])).is_err());
        assert!(format_positional("a }", &[]).is_err());
        assert!(format_positional("{name}", &args(&["a"])).is_err());
    }
}
