//! Card network classification by BIN prefix.

use std::fmt;

/// Card network inferred from the leading digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Brand {
    /// Prefix `4`
    Visa,
    /// Prefixes `51`-`55`
    MasterCard,
    /// Prefixes `34` and `37`
    AmericanExpress,
    /// Prefix `6`
    Discover,
    /// Anything else
    Unknown,
}

impl Brand {
    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Visa => "Visa",
            Self::MasterCard => "MasterCard",
            Self::AmericanExpress => "American Express",
            Self::Discover => "Discover",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const MASTERCARD_PREFIXES: &[&str] = &["51", "52", "53", "54", "55"];
const AMEX_PREFIXES: &[&str] = &["34", "37"];

/// Classifies a prefix. Rules are checked in order and the first match wins.
///
/// # Examples
///
/// ```
/// use cardgen_core::brand::{classify, Brand};
///
/// assert_eq!(classify("4111"), Brand::Visa);
/// assert_eq!(classify("999999").label(), "Unknown");
/// ```
#[must_use]
pub fn classify(prefix: &str) -> Brand {
    if prefix.starts_with('4') {
        Brand::Visa
    } else if MASTERCARD_PREFIXES.iter().any(|p| prefix.starts_with(p)) {
        Brand::MasterCard
    } else if AMEX_PREFIXES.iter().any(|p| prefix.starts_with(p)) {
        Brand::AmericanExpress
    } else if prefix.starts_with('6') {
        Brand::Discover
    } else {
        Brand::Unknown
    }
}
