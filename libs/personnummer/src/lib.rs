//! # personnummer
//!
//! Parsing, validation and serialization of Swedish personal identity
//! numbers.
//!
//! ## Format
//!
//! A personnummer encodes a birth date, a three-digit running number and a
//! check digit. Four layouts are accepted:
//!
//! - `196010052030` (long)
//! - `6010052030` (short)
//! - `19601005-2030` (long, separated)
//! - `601005-2030` (short, separated)
//!
//! Two-digit years resolve to the latest century that does not put the birth
//! date in the future. The canonical rendering is always the long form, with
//! an optional separator between date and number.
//!
//! ## Validity
//!
//! [`Personnummer::new`] computes the check digit. Parsing keeps whatever
//! check digit the input carries, so [`Personnummer::is_valid`] must be
//! consulted for untrusted input.
//!
//! ## Interchange
//!
//! - Text: `Display` / `FromStr`
//! - JSON: `Serialize` / `Deserialize` as a string
//! - Storage: [`StorageValue`], plus `sqlx` PostgreSQL support behind the
//!   `sqlx` feature

mod checksum;
mod error;
mod parser;
mod storage;
mod types;

pub use checksum::compute_checksum;
pub use error::{NumberField, PersonnummerError};
pub use parser::{Layout, Parser, ParserConfig, SEPARATOR};
pub use storage::StorageValue;
pub use types::*;
