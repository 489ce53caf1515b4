//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Replace NaN and infinities with zero so comparisons stay total.
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Scale a 32-bit generator state into `[0, size)`.
///
/// Equivalent to `floor((state / 2^32) * size)` evaluated exactly in integers.
#[must_use]
pub fn scale_to_index(state: u64, size: usize) -> usize {
    let size_wide = cast::<usize, u128>(size).unwrap_or(0);
    let scaled = (u128::from(state & 0xFFFF_FFFF) * size_wide) >> 32;
    cast::<u128, usize>(scaled).unwrap_or(0)
}

/// Convert u32 to f64 for averaging; lossless on every supported platform.
#[must_use]
pub fn u32_to_f64(value: u32) -> f64 {
    f64::from(value)
}

/// Round a ratio to a whole percentage, returning 0 for an empty denominator.
#[must_use]
pub fn rounded_percentage(numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let pct = (u32_to_f64(numerator) / u32_to_f64(denominator)) * 100.0;
    cast::<f64, u32>(pct.round()).unwrap_or(0)
}
