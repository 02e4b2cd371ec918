//! Card domain types.
//!
//! Constructors validate their input so that values reaching the generator
//! and exporter always satisfy the record invariants.

use crate::config::MAX_BATCH_SIZE;
use crate::error::CardGenError;
use std::fmt;

/// Total length of a generated card number, check digit included.
pub const CARD_NUMBER_LEN: usize = 16;
/// Longest accepted BIN; leaves room for the check digit.
pub const MAX_BIN_LEN: usize = CARD_NUMBER_LEN - 1;

/// Issuer prefix of 1 to 15 decimal digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bin(String);

impl Bin {
    /// Validates a BIN.
    ///
    /// # Errors
    ///
    /// Returns `CardGenError::InvalidInput` if `s` is empty, longer than 15
    /// characters, or contains anything other than ASCII digits.
    pub fn parse(s: &str) -> Result<Self, CardGenError> {
        if s.is_empty() {
            return Err(CardGenError::invalid("BIN must not be empty"));
        }
        if s.len() > MAX_BIN_LEN {
            return Err(CardGenError::invalid(format!(
                "BIN must be at most {MAX_BIN_LEN} digits, got {}",
                s.len()
            )));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardGenError::invalid("BIN must contain digits only"));
        }
        Ok(Self(s.to_string()))
    }

    /// The prefix as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of random digits needed to reach a 15-digit base.
    #[must_use]
    pub fn random_len(&self) -> usize {
        MAX_BIN_LEN - self.0.len()
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of records in one batch, always within `1..=50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BatchSize(usize);

impl BatchSize {
    /// Smallest batch.
    pub const ONE: Self = Self(1);

    /// Validates a requested count.
    ///
    /// # Errors
    ///
    /// Returns `CardGenError::InvalidInput` if `count` is 0 or above 50.
    pub fn new(count: usize) -> Result<Self, CardGenError> {
        if (1..=MAX_BATCH_SIZE).contains(&count) {
            Ok(Self(count))
        } else {
            Err(CardGenError::invalid(format!(
                "count must be between 1 and {MAX_BATCH_SIZE}, got {count}"
            )))
        }
    }

    /// Clamps a requested count into range instead of rejecting it.
    ///
    /// ```
    /// use cardgen_core::card::BatchSize;
    ///
    /// assert_eq!(BatchSize::clamped(0).get(), 1);
    /// assert_eq!(BatchSize::clamped(999).get(), 50);
    /// ```
    #[must_use]
    pub fn clamped(count: usize) -> Self {
        Self(count.clamp(1, MAX_BATCH_SIZE))
    }

    /// The count.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self::ONE
    }
}

/// Expiry month, `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryMonth(u8);

impl ExpiryMonth {
    /// Validates a numeric month.
    ///
    /// # Errors
    ///
    /// Returns `CardGenError::InvalidInput` outside `1..=12`.
    pub fn new(month: u8) -> Result<Self, CardGenError> {
        if (1..=12).contains(&month) {
            Ok(Self(month))
        } else {
            Err(CardGenError::invalid(format!(
                "expiry month must be 01-12, got {month:02}"
            )))
        }
    }

    /// Parses a two-digit `MM` string.
    ///
    /// # Errors
    ///
    /// Returns `CardGenError::InvalidInput` if the text is not two digits
    /// forming a month.
    pub fn parse(s: &str) -> Result<Self, CardGenError> {
        if s.len() != 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardGenError::invalid(format!(
                "expiry month must be two digits (MM), got '{s}'"
            )));
        }
        let month = s
            .parse::<u8>()
            .map_err(|e| CardGenError::invalid(e.to_string()))?;
        Self::new(month)
    }

    pub(crate) const fn from_raw(month: u8) -> Self {
        Self(month)
    }

    /// Month number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ExpiryMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Four-digit expiry year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryYear(u16);

impl ExpiryYear {
    /// Validates a numeric year.
    ///
    /// # Errors
    ///
    /// Returns `CardGenError::InvalidInput` outside `1000..=9999`.
    pub fn new(year: u16) -> Result<Self, CardGenError> {
        if (1000..=9999).contains(&year) {
            Ok(Self(year))
        } else {
            Err(CardGenError::invalid(format!(
                "expiry year must be between 1000 and 9999, got {year}"
            )))
        }
    }

    /// Parses a `YYYY` string.
    ///
    /// # Errors
    ///
    /// Returns `CardGenError::InvalidInput` if the text is not four digits or
    /// starts with `0`.
    pub fn parse(s: &str) -> Result<Self, CardGenError> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardGenError::invalid(format!(
                "expiry year must be four digits (YYYY), got '{s}'"
            )));
        }
        if s.starts_with('0') {
            return Err(CardGenError::invalid(format!(
                "expiry year must not start with 0, got '{s}'"
            )));
        }
        let year = s
            .parse::<u16>()
            .map_err(|e| CardGenError::invalid(e.to_string()))?;
        Self::new(year)
    }

    pub(crate) const fn from_raw(year: u16) -> Self {
        Self(year)
    }

    /// Year number.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ExpiryYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One synthesized card entry.
///
/// `Display` yields the canonical `NUMBER|MM|YYYY|CVV` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    number: String,
    expiry_month: ExpiryMonth,
    expiry_year: ExpiryYear,
    cvv: u16,
}

impl CardRecord {
    /// Builds a record from already validated parts.
    ///
    /// # Errors
    ///
    /// Returns `CardGenError::InvalidInput` if `number` is not Luhn-valid or
    /// `cvv` is above 999.
    pub fn new(
        number: impl Into<String>,
        expiry_month: ExpiryMonth,
        expiry_year: ExpiryYear,
        cvv: u16,
    ) -> Result<Self, CardGenError> {
        let number = number.into();
        if !crate::luhn::is_valid(&number) {
            return Err(CardGenError::invalid(
                "card number does not pass the Luhn check",
            ));
        }
        if cvv > 999 {
            return Err(CardGenError::invalid(format!("cvv must be 000-999, got {cvv}")));
        }
        Ok(Self {
            number,
            expiry_month,
            expiry_year,
            cvv,
        })
    }

    /// Parses a canonical `NUMBER|MM|YYYY|CVV` line.
    ///
    /// # Errors
    ///
    /// Returns `CardGenError::InvalidInput` if any field is malformed.
    pub fn parse_canonical(line: &str) -> Result<Self, CardGenError> {
        let parts: Vec<&str> = line.split('|').collect();
        let [number, month, year, cvv] = parts.as_slice() else {
            return Err(CardGenError::invalid(format!(
                "expected NUMBER|MM|YYYY|CVV, got '{line}'"
            )));
        };
        if cvv.len() != 3 || !cvv.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardGenError::invalid(format!("cvv must be three digits, got '{cvv}'")));
        }
        let cvv = cvv
            .parse::<u16>()
            .map_err(|e| CardGenError::invalid(e.to_string()))?;
        Self::new(
            *number,
            ExpiryMonth::parse(month)?,
            ExpiryYear::parse(year)?,
            cvv,
        )
    }

    pub(crate) const fn from_parts(
        number: String,
        expiry_month: ExpiryMonth,
        expiry_year: ExpiryYear,
        cvv: u16,
    ) -> Self {
        Self {
            number,
            expiry_month,
            expiry_year,
            cvv,
        }
    }

    /// The full card number.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Expiry month.
    #[must_use]
    pub const fn expiry_month(&self) -> ExpiryMonth {
        self.expiry_month
    }

    /// Expiry year.
    #[must_use]
    pub const fn expiry_year(&self) -> ExpiryYear {
        self.expiry_year
    }

    /// Zero-padded three-digit CVV.
    #[must_use]
    pub fn cvv(&self) -> String {
        format!("{:03}", self.cvv)
    }
}

impl fmt::Display for CardRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{:03}",
            self.number, self.expiry_month, self.expiry_year, self.cvv
        )
    }
}

/// Records produced by one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Batch {
    records: Vec<CardRecord>,
}

impl Batch {
    /// Wraps records into a batch.
    #[must_use]
    pub const fn new(records: Vec<CardRecord>) -> Self {
        Self { records }
    }

    /// Records in generation order.
    #[must_use]
    pub fn records(&self) -> &[CardRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if the batch holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Canonical lines, one per record.
    pub fn canonical_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.records.iter().map(ToString::to_string)
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a CardRecord;
    type IntoIter = std::slice::Iter<'a, CardRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_parse() {
        assert_eq!(Bin::parse("457821").map(|b| b.random_len()), Ok(9));
        assert_eq!(Bin::parse("123456789012345").map(|b| b.random_len()), Ok(0));
        assert!(Bin::parse("").is_err());
        assert!(Bin::parse("1234567890123456").is_err());
        assert!(Bin::parse("45a821").is_err());
        assert!(Bin::parse("４５").is_err());
    }

    #[test]
    fn test_batch_size_bounds() {
        assert!(BatchSize::new(0).is_err());
        assert!(BatchSize::new(51).is_err());
        assert_eq!(BatchSize::new(50).map(BatchSize::get), Ok(50));
        assert_eq!(BatchSize::clamped(7).get(), 7);
        assert_eq!(BatchSize::default().get(), 1);
    }

    #[test]
    fn test_expiry_parsing() {
        assert_eq!(ExpiryMonth::parse("07").map(|m| m.to_string()), Ok("07".to_string()));
        assert!(ExpiryMonth::parse("00").is_err());
        assert!(ExpiryMonth::parse("13").is_err());
        assert!(ExpiryMonth::parse("7").is_err());
        assert_eq!(ExpiryYear::parse("2028").map(ExpiryYear::get), Ok(2028));
        assert!(ExpiryYear::parse("28").is_err());
        assert!(ExpiryYear::parse("0999").is_err());
    }

    #[test]
    fn test_leading_zero_year_reports_what_was_typed() {
        assert_eq!(
            ExpiryYear::parse("0999"),
            Err(CardGenError::invalid(
                "expiry year must not start with 0, got '0999'"
            ))
        );
        assert_eq!(
            ExpiryYear::new(999),
            Err(CardGenError::invalid(
                "expiry year must be between 1000 and 9999, got 999"
            ))
        );
    }

    #[test]
    fn test_record_canonical_form() -> Result<(), CardGenError> {
        let record = CardRecord::new(
            "4000000000000002",
            ExpiryMonth::new(1)?,
            ExpiryYear::new(2026)?,
            7,
        )?;
        assert_eq!(record.to_string(), "4000000000000002|01|2026|007");
        assert_eq!(record.cvv(), "007");
        assert_eq!(CardRecord::parse_canonical(&record.to_string())?, record);
        Ok(())
    }

    #[test]
    fn test_record_rejects_bad_fields() {
        assert!(CardRecord::parse_canonical("4000000000000001|01|2026|123").is_err());
        assert!(CardRecord::parse_canonical("4000000000000002|01|2026").is_err());
        assert!(CardRecord::parse_canonical("4000000000000002|01|2026|12").is_err());
        assert!(CardRecord::parse_canonical("4000000000000002|13|2026|123").is_err());
    }
}
