use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The two families of record failures. A `Format` failure means the data could not be parsed at
/// all, an `Integrity` failure means it parsed but broke a domain invariant.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Format,
    Integrity,
}

serde_plain::derive_display_from_serialize!(ErrorKind);

/// Why a single export record was rejected.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ParseError {
    #[error("format error: record has {found} fields, field {index} is missing")]
    MissingField { index: usize, found: usize },

    #[error("format error in {field} '{value}': {reason}")]
    Format {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("integrity error in {field} '{value}': {reason}")]
    Integrity {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl ParseError {
    pub(crate) fn format(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ParseError::Format {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn integrity(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ParseError::Integrity {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::MissingField { .. } | ParseError::Format { .. } => ErrorKind::Format,
            ParseError::Integrity { .. } => ErrorKind::Integrity,
        }
    }

    /// The name of the offending field, if the failure concerns one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ParseError::MissingField { .. } => None,
            ParseError::Format { field, .. } | ParseError::Integrity { field, .. } => Some(*field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_format() {
        let e = ParseError::MissingField { index: 8, found: 7 };
        assert_eq!(e.kind(), ErrorKind::Format);
        assert!(e.field().is_none());
    }

    #[test]
    fn test_display_names_field_and_value() {
        let e = ParseError::integrity("amount", "-1.00", "magnitude is negative");
        assert_eq!(e.kind(), ErrorKind::Integrity);
        assert_eq!(e.field(), Some("amount"));
        assert_eq!(
            e.to_string(),
            "integrity error in amount '-1.00': magnitude is negative"
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::Format.to_string(), "format");
        assert_eq!(ErrorKind::Integrity.to_string(), "integrity");
    }
}
