//! Batch synthesis.
//!
//! The random source is a parameter so tests can use a seeded generator and
//! assert exact output.

use crate::card::{Batch, BatchSize, Bin, CardRecord, ExpiryMonth, ExpiryYear};
use crate::config::{EXPIRY_YEAR_MAX, EXPIRY_YEAR_MIN};
use crate::luhn;
use rand::Rng;

/// Expiry fields fixed by the caller. `None` fields are drawn per record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiryOverride {
    /// Fixed month for every record
    pub month: Option<ExpiryMonth>,
    /// Fixed year for every record
    pub year: Option<ExpiryYear>,
}

impl ExpiryOverride {
    /// Fixes both month and year.
    #[must_use]
    pub const fn fixed(month: ExpiryMonth, year: ExpiryYear) -> Self {
        Self {
            month: Some(month),
            year: Some(year),
        }
    }
}

/// Parameters of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Leading digits shared by every number
    pub bin: Bin,
    /// Number of records
    pub count: BatchSize,
    /// Optional fixed expiry
    pub expiry: ExpiryOverride,
}

impl GenerationRequest {
    /// Request for a single record with random expiry.
    #[must_use]
    pub fn new(bin: Bin) -> Self {
        Self {
            bin,
            count: BatchSize::ONE,
            expiry: ExpiryOverride::default(),
        }
    }

    /// Sets the record count.
    #[must_use]
    pub fn with_count(mut self, count: BatchSize) -> Self {
        self.count = count;
        self
    }

    /// Sets the expiry override.
    #[must_use]
    pub fn with_expiry(mut self, expiry: ExpiryOverride) -> Self {
        self.expiry = expiry;
        self
    }
}

/// Generates `count` records starting with `bin`.
///
/// `count` is trusted as given; range enforcement lives in [`BatchSize`].
/// Each number is `bin`, then random digits up to 15, then the Luhn check
/// digit. CVVs are always drawn per record, expiry fields only when not fixed.
///
/// # Examples
///
/// ```
/// use cardgen_core::card::{BatchSize, Bin};
/// use cardgen_core::generator::{generate, ExpiryOverride};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let bin = Bin::parse("457821").unwrap();
/// let batch = generate(&mut rng, &bin, BatchSize::ONE, ExpiryOverride::default());
/// assert!(batch.records()[0].number().starts_with("457821"));
/// ```
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    bin: &Bin,
    count: BatchSize,
    expiry: ExpiryOverride,
) -> Batch {
    let records = (0..count.get())
        .map(|_| generate_record(rng, bin, expiry))
        .collect();
    Batch::new(records)
}

/// Convenience wrapper taking a [`GenerationRequest`].
pub fn generate_request<R: Rng + ?Sized>(rng: &mut R, request: &GenerationRequest) -> Batch {
    generate(rng, &request.bin, request.count, request.expiry)
}

fn generate_record<R: Rng + ?Sized>(rng: &mut R, bin: &Bin, expiry: ExpiryOverride) -> CardRecord {
    let mut digits: Vec<u8> = bin.as_str().bytes().map(|b| b - b'0').collect();
    digits.extend((0..bin.random_len()).map(|_| rng.random_range(0..=9u8)));
    digits.push(luhn::check_digit(&digits));

    let number: String = digits.iter().map(|d| char::from(b'0' + d)).collect();

    let month = expiry.month.unwrap_or_else(|| random_month(rng));
    let year = expiry.year.unwrap_or_else(|| random_year(rng));
    let cvv = rng.random_range(0..=999u16);

    CardRecord::from_parts(number, month, year, cvv)
}

fn random_month<R: Rng + ?Sized>(rng: &mut R) -> ExpiryMonth {
    ExpiryMonth::from_raw(rng.random_range(1..=12u8))
}

fn random_year<R: Rng + ?Sized>(rng: &mut R) -> ExpiryYear {
    ExpiryYear::from_raw(rng.random_range(EXPIRY_YEAR_MIN..=EXPIRY_YEAR_MAX))
}
