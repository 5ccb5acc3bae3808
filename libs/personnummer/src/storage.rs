//! Conversion to and from database column values.
//!
//! [`StorageValue`] mirrors the kinds of value a SQL driver hands back. A
//! personnummer is always stored as text and can be read back from either a
//! text or a byte column; every other kind is rejected with
//! [`PersonnummerError::TypeMismatch`].

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::PersonnummerError;
use crate::types::Personnummer;

/// A single column value as exchanged with a storage backend.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
}

impl StorageValue {
    /// Short name of the value kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            StorageValue::Null => "null",
            StorageValue::Bool(_) => "bool",
            StorageValue::Integer(_) => "integer",
            StorageValue::Float(_) => "float",
            StorageValue::Text(_) => "text",
            StorageValue::Bytes(_) => "bytes",
            StorageValue::Timestamp(_) => "timestamp",
        }
    }
}

impl From<String> for StorageValue {
    fn from(s: String) -> Self {
        StorageValue::Text(s)
    }
}

impl From<&str> for StorageValue {
    fn from(s: &str) -> Self {
        StorageValue::Text(s.to_string())
    }
}

impl From<Vec<u8>> for StorageValue {
    fn from(bytes: Vec<u8>) -> Self {
        StorageValue::Bytes(bytes)
    }
}

impl From<&[u8]> for StorageValue {
    fn from(bytes: &[u8]) -> Self {
        StorageValue::Bytes(bytes.to_vec())
    }
}

impl Personnummer {
    /// Returns the canonical text form as a storage value.
    #[must_use]
    pub fn to_storage_value(&self) -> StorageValue {
        StorageValue::Text(self.to_string())
    }

    /// Parses a personnummer from a text or byte storage value.
    pub fn from_storage_value(value: StorageValue) -> Result<Self, PersonnummerError> {
        match value {
            StorageValue::Text(s) => Self::parse(&s),
            StorageValue::Bytes(bytes) => Self::from_text_bytes(&bytes),
            other => {
                debug!(kind = other.kind(), "unsupported storage value for personnummer");
                Err(PersonnummerError::TypeMismatch(other.kind()))
            }
        }
    }
}

impl From<&Personnummer> for StorageValue {
    fn from(pnr: &Personnummer) -> Self {
        pnr.to_storage_value()
    }
}

impl TryFrom<StorageValue> for Personnummer {
    type Error = PersonnummerError;

    fn try_from(value: StorageValue) -> Result<Self, Self::Error> {
        Self::from_storage_value(value)
    }
}

// =============================================================================
// PostgreSQL
// =============================================================================

#[cfg(feature = "sqlx")]
mod postgres {
    use sqlx::encode::IsNull;
    use sqlx::error::BoxDynError;
    use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
    use sqlx::{Decode, Encode, Type};

    use super::StorageValue;
    use crate::types::Personnummer;

    impl Type<Postgres> for Personnummer {
        fn type_info() -> PgTypeInfo {
            <String as Type<Postgres>>::type_info()
        }

        fn compatible(ty: &PgTypeInfo) -> bool {
            <String as Type<Postgres>>::compatible(ty)
        }
    }

    impl<'q> Encode<'q, Postgres> for Personnummer {
        fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
            <String as Encode<'q, Postgres>>::encode_by_ref(&self.to_string(), buf)
        }
    }

    impl<'r> Decode<'r, Postgres> for Personnummer {
        fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
            let text = <String as Decode<'r, Postgres>>::decode(value)?;
            Ok(Personnummer::from_storage_value(StorageValue::Text(text))?)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::{RunningNumber, Separator};

    fn sample() -> Personnummer {
        Personnummer::new(
            NaiveDate::from_ymd_opt(1980, 11, 16).unwrap(),
            RunningNumber::new(600).unwrap(),
        )
    }

    #[test]
    fn test_to_storage_value_is_text() {
        let value = sample().with_separator(Separator::Dash).to_storage_value();
        assert_eq!(value, StorageValue::Text("19801116-6009".to_string()));
    }

    #[test]
    fn test_storage_roundtrip_text() {
        let pnr = sample();
        let parsed = Personnummer::from_storage_value(pnr.to_storage_value()).unwrap();
        assert_eq!(parsed, pnr);
        assert!(parsed.is_female());
    }

    #[test]
    fn test_storage_roundtrip_bytes() {
        let value = StorageValue::from(b"801116-6009".as_slice());
        let parsed = Personnummer::try_from(value).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_storage_rejects_other_kinds() {
        let rejected = [
            StorageValue::Null,
            StorageValue::Bool(true),
            StorageValue::Integer(198011166009),
            StorageValue::Float(1.5),
            StorageValue::Timestamp(
                NaiveDate::from_ymd_opt(1980, 11, 16)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            ),
        ];

        for value in rejected {
            let kind = value.kind();
            let err = Personnummer::from_storage_value(value).unwrap_err();
            assert_eq!(err, PersonnummerError::TypeMismatch(kind));
        }
    }

    #[test]
    fn test_storage_propagates_parse_errors() {
        let err = Personnummer::from_storage_value("19801116-60091".into()).unwrap_err();
        assert!(err.is_format_error());
    }
}
