//! Luhn (mod 10) checksum.
//!
//! Digits are passed as `u8` values in `0..=9`. Callers validate text input
//! before handing it over; see [`digits`].

/// Computes the check digit that makes `digits` followed by it Luhn-valid.
///
/// The rightmost input digit sits next to the pending check digit, so it is
/// the first doubled position.
///
/// # Examples
///
/// ```
/// use cardgen_core::luhn::check_digit;
///
/// // 7992739871 -> 3
/// assert_eq!(check_digit(&[7, 9, 9, 2, 7, 3, 9, 8, 7, 1]), 3);
/// ```
#[must_use]
pub fn check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let d = u32::from(d);
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    // sum % 10 < 10, so the result always fits a single digit
    ((10 - sum % 10) % 10) as u8
}

/// Converts an ASCII digit string into digit values.
///
/// Returns `None` if the string is empty or contains anything but `0-9`.
#[must_use]
pub fn digits(s: &str) -> Option<Vec<u8>> {
    if s.is_empty() {
        return None;
    }
    s.bytes()
        .map(|b| b.is_ascii_digit().then(|| b - b'0'))
        .collect()
}

/// Returns `true` if `number` is a digit string whose last digit is its Luhn check digit.
#[must_use]
pub fn is_valid(number: &str) -> bool {
    match digits(number) {
        Some(d) if d.len() >= 2 => {
            let (body, check) = d.split_at(d.len() - 1);
            check_digit(body) == check[0]
        }
        _ => false,
    }
}
