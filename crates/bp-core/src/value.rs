use std::borrow::Cow;
use std::fmt;

/// A value flowing through the pattern algebra.
///
/// Mappers extract one of these from an input string; predicates and
/// serializers consume them. Absence ("no match") is never a `Value`, it is
/// `None` at the call site.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    Tuple(Vec<Value>),
}

impl Value {
    /// Truthiness used by the default predicate and the `any` selector.
    /// Empty strings, zero, NaN and `false` are falsy; tuples are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Num(n) => *n != 0.0 && !n.is_nan(),
            Value::Bool(b) => *b,
            Value::Tuple(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Canonical text form. Borrows when the value already is a string.
    ///
    /// This is the form a value takes when a pattern is re-targeted onto it
    /// (`chain`) or when it is labelled by the default serializer.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Value::Str(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Num(n) if n.is_nan() => f.write_str("NaN"),
            Value::Num(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // f64's Display already drops the trailing ".0" of integral values
            Value::Num(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Tuple(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Num(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Tuple(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(Value::from("a").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::Num(3.0).is_truthy());
        assert!(!Value::Num(0.0).is_truthy());
        assert!(!Value::Num(f64::NAN).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Tuple(vec![]).is_truthy());
    }

    #[test]
    fn test_integral_numbers_print_without_fraction() {
        assert_eq!(Value::Num(20000.0).to_string(), "20000");
        assert_eq!(Value::Num(1.5).to_string(), "1.5");
        assert_eq!(Value::Num(f64::INFINITY).to_string(), "Infinity");
    }

    #[test]
    fn test_tuple_joins_with_commas() {
        let v = Value::Tuple(vec!["12".into(), Value::Num(3.0), Value::Bool(true)]);
        assert_eq!(v.to_string(), "12,3,true");
    }

    #[test]
    fn test_text_borrows_strings() {
        let v = Value::from("abc");
        assert!(matches!(v.text(), Cow::Borrowed("abc")));
        assert_eq!(Value::Num(7.0).text(), "7");
    }
}
