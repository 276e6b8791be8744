use std::fmt;

/// Failures of the construction, decoding and ordering APIs.
///
/// Arithmetic never produces one of these: indeterminate results are the
/// `Undefined` value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XnError {
    /// Zero denominator, zero infinity parameter.
    InvalidArgument(String),
    /// An input that is not one of the accepted numeric representations.
    UnsupportedOperand(String),
    /// A wire record that violates the encoding schema.
    MalformedEncoding(String),
    /// Ordering requested between values that have no order.
    UnorderedOperands(String),
    /// An operation with no meaning for the given kind (e.g. `sign` of a complex).
    UndefinedOperation(String),
}

impl fmt::Display for XnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XnError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            XnError::UnsupportedOperand(msg) => write!(f, "unsupported operand: {msg}"),
            XnError::MalformedEncoding(msg) => write!(f, "malformed encoding: {msg}"),
            XnError::UnorderedOperands(msg) => write!(f, "unordered operands: {msg}"),
            XnError::UndefinedOperation(msg) => write!(f, "undefined operation: {msg}"),
        }
    }
}

impl std::error::Error for XnError {}

impl From<serde_json::Error> for XnError {
    fn from(e: serde_json::Error) -> Self {
        XnError::MalformedEncoding(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, XnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let e = XnError::InvalidArgument("zero denominator".into());
        assert_eq!(e.to_string(), "invalid argument: zero denominator");

        let e = XnError::UnorderedOperands("1+i vs 2".into());
        assert!(e.to_string().starts_with("unordered operands"));
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let e: XnError = err.into();
        assert!(matches!(e, XnError::MalformedEncoding(_)));
    }
}
