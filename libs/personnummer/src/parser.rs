//! Parsing of the four textual personnummer layouts.
//!
//! | Layout           | Example         | Length |
//! |------------------|-----------------|--------|
//! | `Long`           | `196010052030`  | 12     |
//! | `Short`          | `6010052030`    | 10     |
//! | `LongSeparated`  | `19601005-2030` | 13     |
//! | `ShortSeparated` | `601005-2030`   | 11     |
//!
//! The layout is picked from the length alone. The date is followed by a
//! fixed three-character running number and a single check digit.

use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use tracing::{debug, trace};

use crate::error::{NumberField, PersonnummerError};
use crate::types::{Personnummer, RunningNumber, Separator};

/// The only separator recognized between the date and number parts.
pub const SEPARATOR: char = '-';

const DATE_FORMAT: &str = "%Y%m%d";
const NUMBER_LEN: usize = 3;

// =============================================================================
// Layout
// =============================================================================

/// One of the four accepted textual layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// `YYYYMMDDNNNC`
    Long,
    /// `YYMMDDNNNC`
    Short,
    /// `YYYYMMDD-NNNC`
    LongSeparated,
    /// `YYMMDD-NNNC`
    ShortSeparated,
}

impl Layout {
    /// Total length in bytes of a personnummer in this layout.
    #[must_use]
    pub const fn text_len(self) -> usize {
        match self {
            Layout::Long => 12,
            Layout::Short => 10,
            Layout::LongSeparated => 13,
            Layout::ShortSeparated => 11,
        }
    }

    /// Number of date digits at the start of the text.
    #[must_use]
    pub const fn date_len(self) -> usize {
        match self {
            Layout::Long | Layout::LongSeparated => 8,
            Layout::Short | Layout::ShortSeparated => 6,
        }
    }

    #[must_use]
    pub const fn is_separated(self) -> bool {
        matches!(self, Layout::LongSeparated | Layout::ShortSeparated)
    }

    /// Picks the layout for `input` and checks the separator placement.
    pub fn detect(input: &str) -> Result<Self, PersonnummerError> {
        if !input.is_ascii() {
            return Err(PersonnummerError::Format(
                "personnummer contains non-ASCII characters".to_string(),
            ));
        }

        let layout = match input.len() {
            12 => Layout::Long,
            10 => Layout::Short,
            13 => Layout::LongSeparated,
            11 => Layout::ShortSeparated,
            len => {
                return Err(PersonnummerError::Format(format!(
                    "wrong length, should be 10-13, but is {len}"
                )));
            }
        };

        let separators = input.matches(SEPARATOR).count();
        match (layout.is_separated(), separators) {
            (false, 0) | (true, 1) => {}
            (false, _) => {
                return Err(PersonnummerError::Format(format!(
                    "unexpected '{SEPARATOR}' in {}-character personnummer",
                    input.len()
                )));
            }
            (true, 0) => {
                return Err(PersonnummerError::Format(format!(
                    "missing '{SEPARATOR}' in personnummer"
                )));
            }
            (true, n) => {
                return Err(PersonnummerError::Format(format!(
                    "too many '{SEPARATOR}' in personnummer, found {n}"
                )));
            }
        }

        if layout.is_separated() && input.as_bytes()[layout.date_len()] != SEPARATOR as u8 {
            return Err(PersonnummerError::Format(format!(
                "wrongly positioned '{SEPARATOR}' in personnummer, expected after {} date digits",
                layout.date_len()
            )));
        }

        Ok(layout)
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Layout::Long => "long",
            Layout::Short => "short",
            Layout::LongSeparated => "long_separated",
            Layout::ShortSeparated => "short_separated",
        };
        write!(f, "{}", s)
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Settings for [`Parser`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Date two-digit years are resolved against. `None` means today (UTC).
    pub reference_date: Option<NaiveDate>,

    /// Separator stamped onto every parsed record for rendering.
    pub separator: Separator,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    fn reference_date_or_today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Utc::now().date_naive())
    }
}

// =============================================================================
// Parser
// =============================================================================

/// Parses personnummer text according to a [`ParserConfig`].
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses `input` in any of the four layouts.
    ///
    /// The checksum is taken as found; a structurally correct input with a
    /// wrong check digit parses fine and reports `is_valid() == false`.
    pub fn parse(&self, input: &str) -> Result<Personnummer, PersonnummerError> {
        trace!(input_len = input.len(), "parsing personnummer");

        let result = self.parse_layout(input);
        if let Err(err) = &result {
            debug!(input_len = input.len(), error = %err, "rejected personnummer");
        }
        result
    }

    fn parse_layout(&self, input: &str) -> Result<Personnummer, PersonnummerError> {
        let layout = Layout::detect(input)?;
        trace!(%layout, "detected personnummer layout");

        let (date, rest) = input.split_at(layout.date_len());
        let rest = if layout.is_separated() { &rest[1..] } else { rest };
        let (number, check) = rest.split_at(NUMBER_LEN);

        let birth_date = match layout {
            Layout::Long | Layout::LongSeparated => parse_date(date, date)?,
            Layout::Short | Layout::ShortSeparated => {
                resolve_short_date(date, self.config.reference_date_or_today())?
            }
        };

        let running_number = RunningNumber::new(parse_field(number, NumberField::RunningNumber)?)?;
        let checksum: u8 = parse_field(check, NumberField::Checksum)?;

        Ok(Personnummer::from_parts(
            birth_date,
            running_number,
            checksum,
            self.config.separator,
        ))
    }
}

/// Parses an eight-digit `YYYYMMDD` date. `value` is what errors report.
fn parse_date(digits: &str, value: &str) -> Result<NaiveDate, PersonnummerError> {
    if !is_digits(digits) {
        return Err(PersonnummerError::Date {
            value: value.to_string(),
            reason: "expected only digits".to_string(),
        });
    }

    NaiveDate::parse_from_str(digits, DATE_FORMAT).map_err(|e| PersonnummerError::Date {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Resolves a `YYMMDD` date to the latest century that does not put it after
/// `today`.
///
/// The whole date is compared, not just the year: with today 2026-10-19,
/// `261020` resolves to 1926-10-20 where a year-only rule would give a
/// birth date in the future.
fn resolve_short_date(digits: &str, today: NaiveDate) -> Result<NaiveDate, PersonnummerError> {
    if !is_digits(digits) {
        return Err(PersonnummerError::Date {
            value: digits.to_string(),
            reason: "expected only digits".to_string(),
        });
    }

    // Both sides are eight ASCII digits, so string order is date order.
    let century = today.year().div_euclid(100);
    let today_digits = today.format(DATE_FORMAT).to_string();
    let mut full = format!("{century:02}{digits}");
    if full > today_digits {
        full = format!("{:02}{digits}", century - 1);
        trace!(date = %digits, resolved = %full, "two-digit year moved to previous century");
    }

    parse_date(&full, digits)
}

/// Parses a numeric field, rejecting the sign prefix `str::parse` would allow.
fn parse_field<T>(value: &str, field: NumberField) -> Result<T, PersonnummerError>
where
    T: FromStr<Err = ParseIntError>,
{
    let parsed = value.parse::<T>().map_err(|e| PersonnummerError::Number {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    if !is_digits(value) {
        return Err(PersonnummerError::Number {
            field,
            value: value.to_string(),
            reason: "expected only digits".to_string(),
        });
    }

    Ok(parsed)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// Tests
// =============================================================================
