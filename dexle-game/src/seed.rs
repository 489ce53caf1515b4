//! Target selection: date-seeded LCG for the daily puzzle, uniform draws for free play.
//!
//! The daily path must produce the same index on every machine for a given
//! calendar date, so it only uses wrapping 32-bit integer math.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

use crate::constants::{LCG_INCREMENT, LCG_MODULUS, LCG_MULTIPLIER};
use crate::numbers::scale_to_index;

/// Seed for a calendar date: `year * 10000 + month * 100 + day`.
#[must_use]
pub fn daily_seed(date: NaiveDate) -> u64 {
    let encoded = i64::from(date.year()) * 10_000
        + i64::from(date.month()) * 100
        + i64::from(date.day());
    encoded.unsigned_abs()
}

/// One step of the Numerical Recipes generator, modulo 2^32.
#[must_use]
pub const fn lcg_step(state: u64) -> u64 {
    let z = state % LCG_MODULUS;
    (LCG_MULTIPLIER * z + LCG_INCREMENT) % LCG_MODULUS
}

/// Map a seed to an index in `[0, size)`. Returns 0 for an empty range.
#[must_use]
pub fn select_index(seed: u64, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    scale_to_index(lcg_step(seed), size)
}

/// Index of the daily target for `date`.
#[must_use]
pub fn daily_index(date: NaiveDate, size: usize) -> usize {
    select_index(daily_seed(date), size)
}

/// Uniform, non-reproducible pick used by free play. Returns 0 for an empty range.
pub fn free_play_index<R: Rng + ?Sized>(rng: &mut R, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    rng.gen_range(0..size)
}
