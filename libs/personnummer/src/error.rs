//! Error types for personnummer parsing and conversion.

use thiserror::Error;

/// The numeric field a [`PersonnummerError::Number`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberField {
    /// The three-digit running number.
    RunningNumber,
    /// The trailing check digit.
    Checksum,
}

impl std::fmt::Display for NumberField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberField::RunningNumber => write!(f, "running number"),
            NumberField::Checksum => write!(f, "checksum"),
        }
    }
}

/// Errors that can occur when parsing or converting a personnummer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersonnummerError {
    /// The input does not match any of the accepted layouts.
    #[error("invalid format: {0}")]
    Format(String),

    /// The date portion is not a calendar date.
    #[error("invalid birth date '{value}': {reason}")]
    Date { value: String, reason: String },

    /// The running number or checksum portion is not a non-negative integer.
    #[error("invalid {field} '{value}': {reason}")]
    Number {
        field: NumberField,
        value: String,
        reason: String,
    },

    /// A storage value of an unsupported kind was handed to the decoder.
    #[error("cannot convert {0} to personnummer")]
    TypeMismatch(&'static str),

    /// A running number outside 0-999.
    #[error("running number {0} out of range, must be 0-999")]
    RunningNumberOutOfRange(u16),
}

impl PersonnummerError {
    /// Returns true if the input was structurally malformed.
    pub fn is_format_error(&self) -> bool {
        matches!(self, PersonnummerError::Format(_))
    }

    /// Returns true if the date portion failed to parse.
    pub fn is_date_error(&self) -> bool {
        matches!(self, PersonnummerError::Date { .. })
    }

    /// Returns true if the running number or checksum failed to parse.
    pub fn is_number_error(&self) -> bool {
        matches!(self, PersonnummerError::Number { .. })
    }

    /// Returns true if a storage value had an unsupported kind.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, PersonnummerError::TypeMismatch(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PersonnummerError::Format("wrong length, should be 10-13, but is 9".into());
        assert_eq!(
            err.to_string(),
            "invalid format: wrong length, should be 10-13, but is 9"
        );

        let err = PersonnummerError::Number {
            field: NumberField::Checksum,
            value: "x".into(),
            reason: "invalid digit found in string".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid checksum 'x': invalid digit found in string"
        );

        let err = PersonnummerError::TypeMismatch("integer");
        assert_eq!(err.to_string(), "cannot convert integer to personnummer");
    }

    #[test]
    fn test_error_predicates() {
        assert!(PersonnummerError::Format(String::new()).is_format_error());
        assert!(PersonnummerError::Date {
            value: "19601305".into(),
            reason: "input is out of range".into(),
        }
        .is_date_error());
        assert!(PersonnummerError::TypeMismatch("bool").is_type_mismatch());
        assert!(!PersonnummerError::TypeMismatch("bool").is_number_error());
    }
}
