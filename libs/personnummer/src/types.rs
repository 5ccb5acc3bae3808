//! The personnummer value object and its building blocks.

use chrono::{NaiveDate, Utc};

use crate::checksum::compute_checksum;
use crate::error::PersonnummerError;
use crate::parser::{Layout, Parser};

/// Average Gregorian year length in hours, used for [`Personnummer::age`].
pub const AVERAGE_YEAR_HOURS: f64 = 8765.81;

// =============================================================================
// Running Number
// =============================================================================

/// The three-digit number distinguishing people born on the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunningNumber(u16);

impl RunningNumber {
    /// Largest running number that fits in three digits.
    pub const MAX: u16 = 999;

    /// Creates a running number, rejecting values above 999.
    pub fn new(value: u16) -> Result<Self, PersonnummerError> {
        if value > Self::MAX {
            return Err(PersonnummerError::RunningNumberOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying integer.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns true if the number is even, which marks a female person.
    #[must_use]
    pub const fn is_even(&self) -> bool {
        self.0 % 2 == 0
    }
}

impl std::fmt::Display for RunningNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl TryFrom<u16> for RunningNumber {
    type Error = PersonnummerError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RunningNumber> for u16 {
    fn from(number: RunningNumber) -> Self {
        number.0
    }
}

// =============================================================================
// Sex
// =============================================================================

/// Sex as encoded by the parity of the running number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Female,
    Male,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Female => write!(f, "female"),
            Sex::Male => write!(f, "male"),
        }
    }
}

// =============================================================================
// Separator
// =============================================================================

/// Text placed between the date and the number when rendering.
///
/// Only separators the parser accepts back are representable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Separator {
    /// `YYYYMMDDNNNC`
    #[default]
    None,
    /// `YYYYMMDD-NNNC`
    Dash,
}

impl Separator {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Separator::None => "",
            Separator::Dash => "-",
        }
    }
}

impl std::fmt::Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Personnummer
// =============================================================================

/// A Swedish personal identity number.
///
/// Records built with [`Personnummer::new`] always carry a matching checksum.
/// Parsed records keep the checksum found in the input, so callers that care
/// must check [`Personnummer::is_valid`].
///
/// Equality and hashing ignore the rendering separator.
#[derive(Debug, Clone)]
pub struct Personnummer {
    birth_date: NaiveDate,
    running_number: RunningNumber,
    checksum: u8,
    separator: Separator,
}

impl Personnummer {
    /// Creates a personnummer with the checksum computed from the other fields.
    ///
    /// The text forms only cover years 0000-9999; a record outside that range
    /// renders with a sign or a fifth year digit and does not parse back.
    #[must_use]
    pub fn new(birth_date: NaiveDate, running_number: RunningNumber) -> Self {
        Self {
            birth_date,
            running_number,
            checksum: compute_checksum(birth_date, running_number),
            separator: Separator::None,
        }
    }

    pub(crate) fn from_parts(
        birth_date: NaiveDate,
        running_number: RunningNumber,
        checksum: u8,
        separator: Separator,
    ) -> Self {
        Self {
            birth_date,
            running_number,
            checksum,
            separator,
        }
    }

    /// Parses any of the four accepted layouts, resolving two-digit years
    /// against today's date.
    ///
    /// See [`Parser`] for a configurable variant.
    pub fn parse(s: &str) -> Result<Self, PersonnummerError> {
        Parser::default().parse(s)
    }

    /// Parses raw text bytes, rejecting anything that is not UTF-8.
    pub fn from_text_bytes(bytes: &[u8]) -> Result<Self, PersonnummerError> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| PersonnummerError::Format(format!("not valid UTF-8: {e}")))?;
        Self::parse(s)
    }

    /// Returns true if the checksum matches the birth date and running number.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        compute_checksum(self.birth_date, self.running_number) == self.checksum
    }

    #[must_use]
    pub fn sex(&self) -> Sex {
        if self.running_number.is_even() {
            Sex::Female
        } else {
            Sex::Male
        }
    }

    #[must_use]
    pub fn is_female(&self) -> bool {
        self.sex() == Sex::Female
    }

    #[must_use]
    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    #[must_use]
    pub fn running_number(&self) -> RunningNumber {
        self.running_number
    }

    #[must_use]
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Age in whole years as of today (UTC).
    #[must_use]
    pub fn age(&self) -> i32 {
        self.age_on(Utc::now().date_naive())
    }

    /// Age in whole years as of `date`, or 0 if `date` precedes the birth.
    ///
    /// Elapsed hours are divided by an average year of 8765.81 hours, so the
    /// result can lag a calendar birthday by up to a day. A person born on
    /// 1990-01-01 turns 1 on 1991-01-02, and someone born on a leap day turns
    /// 1 on the following March 1st.
    #[must_use]
    pub fn age_on(&self, date: NaiveDate) -> i32 {
        let hours = (date - self.birth_date).num_hours().max(0);
        (hours as f64 / AVERAGE_YEAR_HOURS) as i32
    }

    /// Returns the separator placed between the date and number when rendering.
    #[must_use]
    pub fn separator(&self) -> Separator {
        self.separator
    }

    /// Sets the separator used when rendering. Defaults to [`Separator::None`].
    pub fn set_separator(&mut self, separator: Separator) {
        self.separator = separator;
    }

    #[must_use]
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.set_separator(separator);
        self
    }

    /// Renders the record in one of the four accepted layouts, ignoring the
    /// configured separator.
    #[must_use]
    pub fn to_layout(&self, layout: Layout) -> String {
        let date = match layout {
            Layout::Long | Layout::LongSeparated => self.birth_date.format("%Y%m%d"),
            Layout::Short | Layout::ShortSeparated => self.birth_date.format("%y%m%d"),
        };
        let separator = if layout.is_separated() {
            Separator::Dash
        } else {
            Separator::None
        };
        format!("{}{}{}{}", date, separator, self.running_number, self.checksum)
    }
}

impl PartialEq for Personnummer {
    fn eq(&self, other: &Self) -> bool {
        self.birth_date == other.birth_date
            && self.running_number == other.running_number
            && self.checksum == other.checksum
    }
}

impl Eq for Personnummer {}

impl std::hash::Hash for Personnummer {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.birth_date.hash(state);
        self.running_number.hash(state);
        self.checksum.hash(state);
    }
}

impl std::fmt::Display for Personnummer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.birth_date.format("%Y%m%d"),
            self.separator,
            self.running_number,
            self.checksum
        )
    }
}

impl std::str::FromStr for Personnummer {
    type Err = PersonnummerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Personnummer {
    type Error = PersonnummerError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Personnummer {
    type Error = PersonnummerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Personnummer> for String {
    fn from(pnr: Personnummer) -> Self {
        pnr.to_string()
    }
}

impl serde::Serialize for Personnummer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Personnummer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pnr(y: i32, m: u32, d: u32, n: u16) -> Personnummer {
        Personnummer::new(date(y, m, d), RunningNumber::new(n).unwrap())
    }

    #[test]
    fn test_running_number_range() {
        assert_eq!(RunningNumber::new(0).unwrap().value(), 0);
        assert_eq!(RunningNumber::new(999).unwrap().value(), 999);
        assert_eq!(
            RunningNumber::try_from(1000).unwrap_err(),
            PersonnummerError::RunningNumberOutOfRange(1000)
        );
    }

    #[test]
    fn test_running_number_padding() {
        assert_eq!(RunningNumber::new(9).unwrap().to_string(), "009");
        assert_eq!(RunningNumber::new(42).unwrap().to_string(), "042");
        assert_eq!(RunningNumber::new(203).unwrap().to_string(), "203");
    }

    #[test]
    fn test_new_is_valid() {
        let p = pnr(1960, 10, 5, 203);
        assert!(p.is_valid());
        assert_eq!(p.checksum(), 0);
        assert_eq!(p.running_number().value(), 203);
        assert_eq!(p.birth_date(), date(1960, 10, 5));
    }

    #[test]
    fn test_sex() {
        assert_eq!(pnr(1960, 10, 5, 203).sex(), Sex::Male);
        assert!(!pnr(1960, 10, 5, 203).is_female());
        assert_eq!(pnr(1980, 11, 16, 600).sex(), Sex::Female);
        assert!(pnr(1980, 11, 16, 600).is_female());
        assert_eq!(Sex::Female.to_string(), "female");
    }

    #[test]
    fn test_display_pads_running_number() {
        let p = pnr(1975, 6, 20, 9);
        assert_eq!(p.to_string(), "197506200091");
        assert_eq!(
            p.with_separator(Separator::Dash).to_string(),
            "19750620-0091"
        );
    }

    #[test]
    fn test_set_separator() {
        let mut p = pnr(1960, 10, 5, 203);
        assert_eq!(p.separator(), Separator::None);
        p.set_separator(Separator::Dash);
        assert_eq!(p.to_string(), "19601005-2030");
        p.set_separator(Separator::None);
        assert_eq!(p.to_string(), "196010052030");
    }

    #[test]
    fn test_equality_ignores_separator() {
        let a = pnr(1960, 10, 5, 203);
        let b = a.clone().with_separator(Separator::Dash);
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_to_layout() {
        let p = pnr(1960, 10, 5, 203).with_separator(Separator::Dash);
        assert_eq!(p.to_layout(Layout::Long), "196010052030");
        assert_eq!(p.to_layout(Layout::Short), "6010052030");
        assert_eq!(p.to_layout(Layout::LongSeparated), "19601005-2030");
        assert_eq!(p.to_layout(Layout::ShortSeparated), "601005-2030");
    }

    #[test]
    fn test_age_on_birthday() {
        let p = pnr(1960, 10, 5, 203);
        assert_eq!(p.age_on(date(2020, 10, 4)), 59);
        assert_eq!(p.age_on(date(2020, 10, 5)), 60);
    }

    #[test]
    fn test_age_average_year_lag() {
        // 365 days is slightly short of an average year.
        let p = pnr(1990, 1, 1, 203);
        assert_eq!(p.age_on(date(1991, 1, 1)), 0);
        assert_eq!(p.age_on(date(1991, 1, 2)), 1);
    }

    #[test]
    fn test_age_leap_day() {
        let p = pnr(2000, 2, 29, 203);
        assert_eq!(p.age_on(date(2001, 2, 28)), 0);
        assert_eq!(p.age_on(date(2001, 3, 1)), 1);
        assert_eq!(p.age_on(date(2004, 2, 28)), 3);
        assert_eq!(p.age_on(date(2004, 2, 29)), 4);
    }

    #[test]
    fn test_age_before_birth() {
        let p = pnr(2000, 1, 1, 203);
        assert_eq!(p.age_on(date(1999, 12, 31)), 0);
        assert_eq!(p.age_on(date(1990, 1, 1)), 0);
        assert_eq!(p.age_on(date(1800, 6, 1)), 0);
    }

    #[test]
    fn test_separator_renders_parseable_text() {
        for separator in [Separator::None, Separator::Dash] {
            let p = pnr(1960, 10, 5, 203).with_separator(separator);
            let parsed = Personnummer::parse(&p.to_string()).unwrap();
            assert_eq!(parsed, p);
            assert_eq!(separator.to_string(), separator.as_str());
        }
    }

    #[test]
    fn test_years_outside_four_digits_do_not_parse_back() {
        let far_future = pnr(10000, 1, 1, 1);
        assert_eq!(far_future.to_string().len(), 14);
        assert!(far_future.to_string().starts_with('+'));
        assert!(Personnummer::parse(&far_future.to_string()).is_err());

        let before_year_zero = pnr(-1, 1, 1, 1);
        assert!(Personnummer::parse(&before_year_zero.to_string()).is_err());

        let last_year = pnr(9999, 12, 31, 1);
        assert_eq!(
            Personnummer::parse(&last_year.to_string()).unwrap(),
            last_year
        );
    }

    #[test]
    fn test_from_text_bytes() {
        let p = Personnummer::from_text_bytes(b"19601005-2030").unwrap();
        assert_eq!(p, pnr(1960, 10, 5, 203));

        let err = Personnummer::from_text_bytes(&[0xff, 0xfe]).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_try_from_string() {
        let p = Personnummer::try_from("196010052030".to_string()).unwrap();
        assert_eq!(String::from(p), "196010052030");
    }

    #[test]
    fn test_json_roundtrip() {
        let p = pnr(1975, 6, 20, 9).with_separator(Separator::Dash);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"19750620-0091\"");
        let parsed: Personnummer = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, p);
        assert_eq!(parsed.running_number().value(), 9);
    }

    #[test]
    fn test_json_rejects_non_string() {
        assert!(serde_json::from_str::<Personnummer>("196010052030").is_err());
        assert!(serde_json::from_str::<Personnummer>("\"6010052030\"").is_ok());
        assert!(serde_json::from_str::<Personnummer>("\"19601005\"").is_err());
    }
}
