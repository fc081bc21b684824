//! Cell value types and coercion rules

use std::fmt;

/// Separator used whenever a list value is rendered as text
pub const LIST_SEPARATOR: &str = ", ";

/// Represents one stored or derived cell value
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CellValue {
    /// No value. An absent cell reads as `Null`.
    #[default]
    Null,

    /// Boolean value (checkbox cells)
    Boolean(bool),

    /// Numeric value
    Number(f64),

    /// Text value
    Text(String),

    /// Ordered list of strings (multi-selects, relation links)
    List(Vec<String>),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Create a new list value
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CellValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Check if the value counts as empty: null or the empty string
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric coercion: null is 0, booleans are 0/1, text is parsed or 0
    ///
    /// Non-finite numbers coerce to 0, the same as unparsable text.
    pub fn to_number(&self) -> f64 {
        match self {
            CellValue::Null => 0.0,
            CellValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::Number(n) if n.is_finite() => *n,
            CellValue::Number(_) => 0.0,
            CellValue::Text(s) => parse_number(s),
            CellValue::List(items) => parse_number(&items.join(LIST_SEPARATOR)),
        }
    }

    /// Boolean coercion: null is false, numbers are nonzero, text is nonempty
    pub fn to_bool(&self) -> bool {
        match self {
            CellValue::Null => false,
            CellValue::Boolean(b) => *b,
            CellValue::Number(n) => *n != 0.0 && !n.is_nan(),
            CellValue::Text(s) => !s.is_empty(),
            CellValue::List(items) => !items.is_empty(),
        }
    }

    /// Whether the value would be treated as false-y in a grouping key
    pub fn is_falsy(&self) -> bool {
        match self {
            CellValue::List(items) => items.is_empty(),
            other => !other.to_bool(),
        }
    }

    /// Get the text if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the list if this is a list value
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            CellValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
            CellValue::List(_) => "list",
        }
    }
}

/// Stringified form: null is empty, booleans are `true`/`false`, lists are
/// joined with [`LIST_SEPARATOR`].
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
            CellValue::List(items) => f.write_str(&items.join(LIST_SEPARATOR)),
        }
    }
}

/// Parse text as a number, yielding 0 for anything unparsable
pub fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Format a number the way it is displayed in a cell
///
/// Integral values print without a fractional part; everything else uses the
/// shortest representation that round-trips.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<Vec<String>> for CellValue {
    fn from(items: Vec<String>) -> Self {
        CellValue::List(items)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_number() {
        assert_eq!(CellValue::Null.to_number(), 0.0);
        assert_eq!(CellValue::Boolean(true).to_number(), 1.0);
        assert_eq!(CellValue::Boolean(false).to_number(), 0.0);
        assert_eq!(CellValue::text("42.5").to_number(), 42.5);
        assert_eq!(CellValue::text(" 7 ").to_number(), 7.0);
        assert_eq!(CellValue::text("abc").to_number(), 0.0);
        assert_eq!(CellValue::text("").to_number(), 0.0);
        assert_eq!(CellValue::Number(f64::NAN).to_number(), 0.0);
        assert_eq!(CellValue::Number(f64::INFINITY).to_number(), 0.0);
        assert_eq!(CellValue::text("NaN").to_number(), 0.0);
    }

    #[test]
    fn test_to_bool() {
        assert!(!CellValue::Null.to_bool());
        assert!(CellValue::Number(-1.0).to_bool());
        assert!(!CellValue::Number(0.0).to_bool());
        assert!(CellValue::text("x").to_bool());
        assert!(!CellValue::text("").to_bool());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Boolean(true).to_string(), "true");
        assert_eq!(CellValue::Number(3000.0).to_string(), "3000");
        assert_eq!(CellValue::Number(0.5).to_string(), "0.5");
        assert_eq!(CellValue::Number(-2.25).to_string(), "-2.25");
        assert_eq!(CellValue::list(["a", "b"]).to_string(), "a, b");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_blank_and_falsy() {
        assert!(CellValue::Null.is_blank());
        assert!(CellValue::text("").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert!(CellValue::Number(0.0).is_falsy());
        assert!(CellValue::List(vec![]).is_falsy());
        assert!(!CellValue::list(["x"]).is_falsy());
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(CellValue::from(3), CellValue::Number(3.0));
        assert_eq!(CellValue::from("a"), CellValue::Text("a".into()));
        assert_eq!(CellValue::from(None::<f64>), CellValue::Null);
    }
}
