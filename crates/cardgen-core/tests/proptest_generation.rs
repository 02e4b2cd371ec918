use cardgen_core::brand::classify;
use cardgen_core::card::{BatchSize, Bin, CardRecord};
use cardgen_core::config::{EXPIRY_YEAR_MAX, EXPIRY_YEAR_MIN};
use cardgen_core::export::{export, ExportFormat};
use cardgen_core::generator::{generate, ExpiryOverride};
use cardgen_core::luhn::{check_digit, is_valid};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Plain doubling-sum over a complete number, independent of `check_digit`.
fn luhn_sum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let d = u32::from(d);
            if i % 2 == 1 {
                let doubled = d * 2;
                doubled / 10 + doubled % 10
            } else {
                d
            }
        })
        .sum()
}

proptest! {
    /// Appending the check digit always yields a sum divisible by 10.
    #[test]
    fn check_digit_completes_sum(digits in proptest::collection::vec(0u8..=9, 0..32)) {
        let check = check_digit(&digits);
        prop_assert!(check <= 9);

        let mut full = digits.clone();
        full.push(check);
        prop_assert_eq!(luhn_sum(&full) % 10, 0);
    }

    /// Any other final digit breaks validity.
    #[test]
    fn wrong_check_digit_is_rejected(digits in proptest::collection::vec(0u8..=9, 1..20), delta in 1u8..=9) {
        let wrong = (check_digit(&digits) + delta) % 10;
        let number: String = digits
            .iter()
            .chain(std::iter::once(&wrong))
            .map(|d| char::from(b'0' + d))
            .collect();
        prop_assert!(!is_valid(&number));
    }

    /// Every generated number is 16 Luhn-valid digits starting with the BIN.
    #[test]
    fn generated_numbers_are_valid(bin in "[0-9]{1,15}", count in 1usize..=50, seed in any::<u64>()) {
        let parsed = Bin::parse(&bin).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let count = BatchSize::new(count).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(seed);

        let batch = generate(&mut rng, &parsed, count, ExpiryOverride::default());

        prop_assert_eq!(batch.len(), count.get());
        for record in &batch {
            prop_assert_eq!(record.number().len(), 16);
            prop_assert!(record.number().starts_with(&bin));
            prop_assert!(is_valid(record.number()));
            prop_assert!((1..=12).contains(&record.expiry_month().get()));
            prop_assert!((EXPIRY_YEAR_MIN..=EXPIRY_YEAR_MAX).contains(&record.expiry_year().get()));
            prop_assert_eq!(record.cvv().len(), 3);
        }
    }

    /// Canonical records survive a parse round and map 1:1 onto delimited rows.
    #[test]
    fn delimited_rows_mirror_canonical_lines(bin in "[0-9]{6}", count in 1usize..=20, seed in any::<u64>()) {
        let parsed = Bin::parse(&bin).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(seed);
        let batch = generate(&mut rng, &parsed, BatchSize::clamped(count), ExpiryOverride::default());

        let file = export(Some(&batch), ExportFormat::Delimited)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let text = String::from_utf8(file.payload).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let rows: Vec<&str> = text.lines().skip(1).collect();

        prop_assert_eq!(rows.len(), batch.len());
        for (record, row) in batch.records().iter().zip(rows) {
            let canonical = record.to_string();
            prop_assert_eq!(canonical.replace('|', ","), row);
            let reparsed = CardRecord::parse_canonical(&canonical)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(&reparsed, record);
        }
    }

    /// Brand classification never panics and ignores everything past the prefix rules.
    #[test]
    fn classify_is_total(prefix in "[0-9]{0,19}", tail in "[0-9]{0,4}") {
        let brand = classify(&prefix);
        if prefix.len() >= 2 {
            prop_assert_eq!(classify(&format!("{prefix}{tail}")), brand);
        }
    }
}
