//! Runtime parameter parsing for the command line.

use quarry_core::{RuntimeParams, ScalarValue};

/// Parse `key=value` into a runtime parameter.
///
/// The value is read as JSON when it is valid JSON (`30`, `2.5`, `true`,
/// `null`, `"quoted"`) and as plain text otherwise.
///
/// ```
/// use quarry::parse_param;
/// use quarry_core::ScalarValue;
///
/// assert_eq!(parse_param("age=30").unwrap(), ("age".to_string(), ScalarValue::Int(30)));
/// assert_eq!(
///     parse_param("name=Smith").unwrap(),
///     ("name".to_string(), ScalarValue::from("Smith"))
/// );
/// ```
///
/// # Errors
///
/// Returns a message when there is no `=` or the key is empty.
pub fn parse_param(text: &str) -> Result<(String, ScalarValue), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", text))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{}'", text));
    }

    let value = serde_json::from_str::<ScalarValue>(value)
        .unwrap_or_else(|_| ScalarValue::from(value));
    Ok((key.to_string(), value))
}

/// Collect parsed pairs into runtime parameters; later keys win.
pub fn params_from_pairs(pairs: impl IntoIterator<Item = (String, ScalarValue)>) -> RuntimeParams {
    pairs.into_iter().collect()
}
