//! Carrier tracking numbers: `TR` followed by nine digits.

use rand::Rng;

pub const TRACKING_PREFIX: &str = "TR";
const TRACKING_DIGITS: usize = 9;

/// Generates a tracking number from the supplied RNG.
///
/// ```rust
/// use arcadia_core::tracking::{generate_tracking_number, is_tracking_number};
///
/// let number = generate_tracking_number(&mut rand::thread_rng());
/// assert!(is_tracking_number(&number));
/// ```
pub fn generate_tracking_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: u32 = rng.gen_range(0..1_000_000_000);
    format!("{TRACKING_PREFIX}{suffix:0width$}", width = TRACKING_DIGITS)
}

pub fn is_tracking_number(value: &str) -> bool {
    value
        .strip_prefix(TRACKING_PREFIX)
        .map(|digits| digits.len() == TRACKING_DIGITS && digits.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}
