//! `.gen` command parsing.
//!
//! Syntax: `.gen <BIN> x<amount> exp=MM|YYYY`. Amount and expiry are
//! optional and may appear in any order after the BIN.

// lazy_regex! keeps patterns in statics; checked at compile time
#![allow(clippy::non_std_lazy_statics)]

use crate::card::{BatchSize, Bin, ExpiryMonth, ExpiryYear, MAX_BIN_LEN};
use crate::error::CardGenError;
use crate::generator::{ExpiryOverride, GenerationRequest};
use lazy_regex::lazy_regex;

/// Command prefix that triggers generation.
pub const COMMAND_PREFIX: &str = ".gen";

/// Usage line shown on malformed input.
pub const USAGE: &str = ".gen <BIN> x<amount> exp=MM|YYYY";

/// `.gen` followed by the whole BIN token
static RE_BIN: lazy_regex::Lazy<regex::Regex> = lazy_regex!(r"^\.gen\s+(\d+)(?:\s|$)");

/// `x<amount>` anywhere after the command
static RE_COUNT: lazy_regex::Lazy<regex::Regex> = lazy_regex!(r"\bx(\d+)\b");

/// `exp=MM|YYYY`
static RE_EXPIRY: lazy_regex::Lazy<regex::Regex> = lazy_regex!(r"\bexp=(\d{2})\|(\d{4})\b");

/// Parses a chat message into a generation request.
///
/// Returns `Ok(None)` when the message is not a `.gen` command at all, so
/// callers can ignore ordinary chatter.
///
/// # Errors
///
/// Returns `CardGenError::InvalidInput` when the message is a `.gen` command
/// with a missing or malformed BIN or expiry.
///
/// # Examples
///
/// ```
/// use cardgen_core::command::parse_generate;
///
/// let request = parse_generate(".gen 510510 x3 exp=07|2028").unwrap().unwrap();
/// assert_eq!(request.bin.as_str(), "510510");
/// assert_eq!(request.count.get(), 3);
///
/// assert!(parse_generate("hello").unwrap().is_none());
/// assert!(parse_generate(".gen").is_err());
/// ```
pub fn parse_generate(text: &str) -> Result<Option<GenerationRequest>, CardGenError> {
    let text = text.trim();
    if !text.starts_with(COMMAND_PREFIX) {
        return Ok(None);
    }

    let bin_digits = RE_BIN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            CardGenError::invalid(format!("expected a BIN of 1-{MAX_BIN_LEN} digits"))
        })?;
    let bin = Bin::parse(bin_digits)?;

    let count = RE_COUNT
        .captures(text)
        .and_then(|caps| caps.get(1))
        // Digits too long for usize still mean "as many as allowed"
        .map(|m| m.as_str().parse::<usize>().unwrap_or(usize::MAX))
        .map_or(BatchSize::ONE, BatchSize::clamped);

    let expiry = match RE_EXPIRY.captures(text) {
        Some(caps) => {
            let month = caps.get(1).map_or("", |m| m.as_str());
            let year = caps.get(2).map_or("", |m| m.as_str());
            ExpiryOverride::fixed(ExpiryMonth::parse(month)?, ExpiryYear::parse(year)?)
        }
        None => ExpiryOverride::default(),
    };

    Ok(Some(
        GenerationRequest::new(bin)
            .with_count(count)
            .with_expiry(expiry),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> GenerationRequest {
        match parse_generate(text) {
            Ok(Some(request)) => request,
            other => panic!("expected a request for {text:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_ignores_other_messages() -> Result<(), CardGenError> {
        assert_eq!(parse_generate("hi there")?, None);
        assert_eq!(parse_generate("/start")?, None);
        assert_eq!(parse_generate("gen 457821")?, None);
        Ok(())
    }

    #[test]
    fn test_defaults() {
        let request = parse(".gen 457821");
        assert_eq!(request.bin.as_str(), "457821");
        assert_eq!(request.count, BatchSize::ONE);
        assert_eq!(request.expiry, ExpiryOverride::default());
    }

    #[test]
    fn test_full_command() {
        let request = parse("  .gen 510510 x3 exp=07|2028 ");
        assert_eq!(request.count.get(), 3);
        assert_eq!(request.expiry.month.map(|m| m.get()), Some(7));
        assert_eq!(request.expiry.year.map(|y| y.get()), Some(2028));
    }

    #[test]
    fn test_option_order_is_free() {
        let request = parse(".gen 4111 exp=12|2030 x5");
        assert_eq!(request.count.get(), 5);
        assert_eq!(request.expiry.month.map(|m| m.get()), Some(12));
    }

    #[test]
    fn test_count_is_clamped() {
        assert_eq!(parse(".gen 4111 x999").count.get(), 50);
        assert_eq!(parse(".gen 4111 x0").count.get(), 1);
        assert_eq!(parse(".gen 4111 x50").count.get(), 50);
        assert_eq!(parse(".gen 4111 x1000").count.get(), 50);
        assert_eq!(parse(".gen 4111 x9999").count.get(), 50);
        assert_eq!(parse(".gen 4111 x99999999999999999999999").count.get(), 50);
    }

    #[test]
    fn test_usage_errors() {
        assert!(matches!(
            parse_generate(".gen"),
            Err(CardGenError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_generate(".gen abc"),
            Err(CardGenError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_generate(".gen 1234567890123456"),
            Err(CardGenError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_generate(".gen 4111 exp=13|2030"),
            Err(CardGenError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_leading_zero_year_error_names_the_input() {
        match parse_generate(".gen 4111 exp=01|0999") {
            Err(CardGenError::InvalidInput(reason)) => assert!(reason.contains("'0999'")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_expiry_is_ignored_like_free_text() {
        // Only the exact exp=MM|YYYY shape is recognized
        let request = parse(".gen 4111 exp=7|30");
        assert_eq!(request.expiry, ExpiryOverride::default());
    }
}
